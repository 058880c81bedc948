use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of thing a directory listing entry is, as far as the scanner cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, fifos, devices and anything else the platform reports.
    Other,
}

/// One entry returned by [`FileSystemSource::list_dir`].
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Base name of the entry, lossily converted to UTF-8.
    pub name: String,
    /// Full path of the entry (listing path joined with the name).
    pub path: PathBuf,
    /// Kind as reported by the listing, without following symlinks.
    pub kind: EntryKind,
}

/// Trait defining the filesystem operations required by the scanner.
/// Keeping them behind a trait lets tests inject failures that are hard to
/// provoke on a real disk.
pub trait FileSystemSource {
    /// Reports the kind of `path`, following symlinks.
    fn resolved_kind_of(&self, path: &Path) -> io::Result<EntryKind>;

    /// Lists the direct children of a directory. Entries that cannot be read
    /// are returned as errors in place so the caller can account for them.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>>;

    /// Size in bytes of a regular file.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Canonical form of a path, used to detect symlink cycles.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Concrete implementation of `FileSystemSource` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn kind_from(file_type: fs::FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileSystemSource for LocalFileSystem {
    fn resolved_kind_of(&self, path: &Path) -> io::Result<EntryKind> {
        Ok(kind_from(fs::metadata(path)?.file_type()))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>> {
        // The iterator (and its handle) is dropped when this call returns.
        let entries = fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                let kind = kind_from(entry.file_type()?);
                Ok(RawEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path(),
                    kind,
                })
            })
            .collect();
        Ok(entries)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
