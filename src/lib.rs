//! Library side of `dirtree`: the tree model, the scanner that builds it from
//! disk, and the rendering, reporting and export built on top.
pub mod builders;
pub mod core;
pub mod utils;
