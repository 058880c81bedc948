// This file is the module declaration file for the `core` module.
// It declares the submodules that make up the scanning pipeline and exposes
// them to the rest of the crate.

// `config` module:
// Defines the configuration file layout (`DirTreeConfig`), the
// `ConfigProvider` trait and the `ConfigManager` that loads, saves and
// validates `dirtree.toml`.
pub mod config;

// `engine` module:
// The `TreeScanner` that walks a directory and builds the tree, together
// with the `ScanOutcome` it returns.
pub mod engine;

// `fs` module:
// The `FileSystemSource` trait the scanner reads through and its
// `LocalFileSystem` implementation.
pub mod fs;

// `report` module:
// Per-entry outcomes collected during a scan and the counters derived from them.
pub mod report;

// `tree` module:
// The `Node` / `FileEntry` / `DirectoryEntry` types and their display.
pub mod tree;
