use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// A single node of the scanned tree.
///
/// Leaves and containers share this one type so that client code can walk a
/// tree without caring which kind of node it holds. Matching on the variant
/// gives direct access to the concrete entry, so no runtime type recovery is
/// ever needed while building or traversing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// A regular file discovered on disk.
    File(FileEntry),
    /// A directory together with everything found below it.
    Directory(DirectoryEntry),
}

/// A leaf of the tree: one regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    name: String,
    /// `None` when the size could not be read at scan time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

/// A composite node of the tree.
///
/// Children are kept in the order they were discovered. The entry owns its
/// children outright; once the scanner has finished populating it there is no
/// public way to change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    name: String,
    #[serde(default)]
    children: Vec<Node>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    fn describe(&self, show_sizes: bool) -> String {
        if !show_sizes {
            return self.name.clone();
        }
        match self.size {
            Some(bytes) => format!("{} ({} bytes)", self.name, bytes),
            None => format!("{} (unknown size)", self.name),
        }
    }
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends a child. Only the scanner populates directories.
    pub(crate) fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub(crate) fn sort_children(&mut self) {
        self.children.sort_by(|a, b| a.name().cmp(b.name()));
    }

    /// Sum of every known file size below this directory.
    pub fn total_size(&self) -> u64 {
        self.children.iter().map(Node::total_size).sum()
    }

    /// Number of regular files below this directory, at any depth.
    pub fn file_count(&self) -> usize {
        self.children.iter().map(Node::file_count).sum()
    }

    /// Number of directories below this directory, not counting itself.
    pub fn directory_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::File(_) => 0,
                Node::Directory(dir) => 1 + dir.directory_count(),
            })
            .sum()
    }

    /// Number of levels below this directory. An empty directory has depth 0.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::File(_) => 1,
                Node::Directory(dir) => 1 + dir.depth(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Looks up a descendant by following child names one level at a time.
    ///
    /// An empty component list returns `None`; the directory itself is not a
    /// descendant.
    pub fn find<S: AsRef<str>>(&self, components: &[S]) -> Option<&Node> {
        let (first, rest) = components.split_first()?;
        let child = self
            .children
            .iter()
            .find(|child| child.name() == first.as_ref())?;
        if rest.is_empty() {
            return Some(child);
        }
        match child {
            Node::Directory(dir) => dir.find(rest),
            Node::File(_) => None,
        }
    }

    /// Writes this directory and all of its descendants to `out`.
    ///
    /// Every line starts with `indent`; each level of nesting adds one more
    /// `unit` in front of it.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        indent: &str,
        unit: &str,
        show_sizes: bool,
    ) -> io::Result<()> {
        writeln!(out, "{}{}/", indent, self.name)?;
        let child_indent = format!("{indent}{unit}");
        for child in &self.children {
            child.render(out, &child_indent, unit, show_sizes)?;
        }
        Ok(())
    }

    /// Prints the tree to standard output using the default indent unit.
    pub fn display(&self, indent: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        // Nothing useful can be done if stdout is closed.
        let _ = self.render(&mut handle, indent, DEFAULT_INDENT_UNIT, true);
    }
}

/// Indentation added per level when no unit is configured.
pub const DEFAULT_INDENT_UNIT: &str = "  ";

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => file.name(),
            Node::Directory(dir) => dir.name(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryEntry> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn total_size(&self) -> u64 {
        match self {
            Node::File(file) => file.size().unwrap_or(0),
            Node::Directory(dir) => dir.total_size(),
        }
    }

    fn file_count(&self) -> usize {
        match self {
            Node::File(_) => 1,
            Node::Directory(dir) => dir.file_count(),
        }
    }

    pub fn render<W: Write>(
        &self,
        out: &mut W,
        indent: &str,
        unit: &str,
        show_sizes: bool,
    ) -> io::Result<()> {
        match self {
            Node::File(file) => writeln!(out, "{}{}", indent, file.describe(show_sizes)),
            Node::Directory(dir) => dir.render(out, indent, unit, show_sizes),
        }
    }

    pub fn display(&self, indent: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = self.render(&mut handle, indent, DEFAULT_INDENT_UNIT, true);
    }
}

impl From<FileEntry> for Node {
    fn from(file: FileEntry) -> Self {
        Node::File(file)
    }
}

impl From<DirectoryEntry> for Node {
    fn from(dir: DirectoryEntry) -> Self {
        Node::Directory(dir)
    }
}
