use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::observer::{NullObserver, ScanObserver};
use crate::core::config::ScanSettings;
use crate::core::fs::{EntryKind, FileSystemSource, LocalFileSystem, RawEntry};
use crate::core::report::{EntryOutcome, ScanReport, ScanSummary};
use crate::core::tree::{DirectoryEntry, FileEntry};

/// Result of one scan: the populated tree and what happened along the way.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub root: DirectoryEntry,
    pub report: ScanReport,
}

impl ScanOutcome {
    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            files: self.root.file_count(),
            directories: self.root.directory_count(),
            total_bytes: self.root.total_size(),
            ..Default::default()
        };
        for record in &self.report.entries {
            match record.outcome {
                EntryOutcome::Added => {}
                EntryOutcome::AddedWithoutSize { .. } => summary.unknown_sizes += 1,
                EntryOutcome::SkippedUnsupported { .. } => summary.skipped_unsupported += 1,
                EntryOutcome::SkippedError { .. } => summary.skipped_errors += 1,
                EntryOutcome::Truncated { .. } => summary.truncated += 1,
            }
        }
        summary
    }
}

/// Walks a directory on disk and builds the matching tree.
///
/// A scan never fails as a whole. A missing root gives an empty tree, and a
/// bad entry is left out; both are recorded in the [`ScanReport`] and passed
/// to the observer.
pub struct TreeScanner {
    source: Box<dyn FileSystemSource>,
    observer: Box<dyn ScanObserver>,
    settings: ScanSettings,
}

impl TreeScanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            source: Box::new(LocalFileSystem::new()),
            observer: Box::new(NullObserver),
            settings,
        }
    }

    pub fn with_source(mut self, source: Box<dyn FileSystemSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn scan(&self, root: &Path) -> ScanOutcome {
        debug!(root = %root.display(), settings = ?self.settings, "starting scan");

        let mut tree = DirectoryEntry::new(root_name(root));
        let mut report = ScanReport::new(root);

        let listing = match self.open_root(root) {
            Ok(listing) => listing,
            Err(reason) => {
                self.observer.on_root_unavailable(root, &reason);
                report.root_error = Some(reason);
                return ScanOutcome { root: tree, report };
            }
        };

        let mut ancestors = Vec::new();
        if self.settings.follow_symlinks
            && let Ok(canonical) = self.source.canonicalize(root)
        {
            ancestors.push(canonical);
        }

        self.populate(&mut tree, root, listing, 0, &mut report, &mut ancestors);

        debug!(
            root = %root.display(),
            entries = report.entries.len(),
            problems = report.problems().count(),
            "scan finished"
        );
        ScanOutcome { root: tree, report }
    }

    fn open_root(&self, root: &Path) -> Result<Vec<io::Result<RawEntry>>, String> {
        match self.source.resolved_kind_of(root) {
            Ok(EntryKind::Directory) => {}
            Ok(_) => return Err("not a directory".to_string()),
            Err(e) => return Err(e.to_string()),
        }
        self.source.list_dir(root).map_err(|e| e.to_string())
    }

    fn record(&self, report: &mut ScanReport, path: PathBuf, outcome: EntryOutcome) {
        self.observer.on_entry(&path, &outcome);
        report.record(path, outcome);
    }

    /// Fills `dir` from an already opened listing of `path`.
    /// `depth` is the depth of `dir` itself; the scan root is at 0.
    fn populate(
        &self,
        dir: &mut DirectoryEntry,
        path: &Path,
        listing: Vec<io::Result<RawEntry>>,
        depth: usize,
        report: &mut ScanReport,
        ancestors: &mut Vec<PathBuf>,
    ) {
        for item in listing {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    self.record(
                        report,
                        path.to_path_buf(),
                        EntryOutcome::SkippedError {
                            reason: format!("unreadable entry: {e}"),
                        },
                    );
                    continue;
                }
            };

            let kind = match self.effective_kind(&entry) {
                Ok(kind) => kind,
                Err(e) => {
                    self.record(
                        report,
                        entry.path,
                        EntryOutcome::SkippedError {
                            reason: e.to_string(),
                        },
                    );
                    continue;
                }
            };

            match kind {
                EntryKind::File => self.add_file(dir, entry, report),
                EntryKind::Directory => {
                    self.add_directory(dir, entry, depth + 1, report, ancestors)
                }
                EntryKind::Symlink => self.record(
                    report,
                    entry.path,
                    EntryOutcome::SkippedUnsupported {
                        kind: "symlink".to_string(),
                    },
                ),
                EntryKind::Other => self.record(
                    report,
                    entry.path,
                    EntryOutcome::SkippedUnsupported {
                        kind: "special file".to_string(),
                    },
                ),
            }
        }

        if self.settings.sort_entries {
            dir.sort_children();
        }
    }

    fn effective_kind(&self, entry: &RawEntry) -> io::Result<EntryKind> {
        if entry.kind == EntryKind::Symlink && self.settings.follow_symlinks {
            self.source.resolved_kind_of(&entry.path)
        } else {
            Ok(entry.kind)
        }
    }

    fn add_file(&self, parent: &mut DirectoryEntry, entry: RawEntry, report: &mut ScanReport) {
        let (size, outcome) = match self.source.file_size(&entry.path) {
            Ok(size) => (Some(size), EntryOutcome::Added),
            Err(e) => (
                None,
                EntryOutcome::AddedWithoutSize {
                    reason: e.to_string(),
                },
            ),
        };
        parent.push(FileEntry::new(entry.name, size).into());
        self.record(report, entry.path, outcome);
    }

    fn add_directory(
        &self,
        parent: &mut DirectoryEntry,
        entry: RawEntry,
        depth: usize,
        report: &mut ScanReport,
        ancestors: &mut Vec<PathBuf>,
    ) {
        if let Some(limit) = self.settings.max_depth
            && depth >= limit
        {
            parent.push(DirectoryEntry::new(entry.name).into());
            self.record(report, entry.path, EntryOutcome::Truncated { depth: limit });
            return;
        }

        let canonical = if self.settings.follow_symlinks {
            match self.source.canonicalize(&entry.path) {
                Ok(canonical) if ancestors.contains(&canonical) => {
                    self.record(
                        report,
                        entry.path,
                        EntryOutcome::SkippedError {
                            reason: "symlink cycle".to_string(),
                        },
                    );
                    return;
                }
                Ok(canonical) => Some(canonical),
                Err(e) => {
                    self.record(
                        report,
                        entry.path,
                        EntryOutcome::SkippedError {
                            reason: e.to_string(),
                        },
                    );
                    return;
                }
            }
        } else {
            None
        };

        // Recurse on the full joined path, never on the bare entry name, so the
        // result does not depend on the working directory.
        let listing = match self.source.list_dir(&entry.path) {
            Ok(listing) => listing,
            Err(e) => {
                self.record(
                    report,
                    entry.path,
                    EntryOutcome::SkippedError {
                        reason: e.to_string(),
                    },
                );
                return;
            }
        };
        self.record(report, entry.path.clone(), EntryOutcome::Added);

        let mut child = DirectoryEntry::new(entry.name);
        let tracked = canonical.is_some();
        if let Some(canonical) = canonical {
            ancestors.push(canonical);
        }
        self.populate(&mut child, &entry.path, listing, depth, report, ancestors);
        if tracked {
            ancestors.pop();
        }
        parent.push(child.into());
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::observer::RecordingObserver;
    use std::collections::HashMap;

    /// In-memory filesystem with hooks for failures a real disk rarely gives.
    #[derive(Default)]
    struct MockFileSystem {
        dirs: HashMap<PathBuf, Vec<(String, EntryKind)>>,
        sizes: HashMap<PathBuf, u64>,
        unreadable_sizes: Vec<PathBuf>,
        unlistable: Vec<PathBuf>,
        broken_entries_in: Vec<PathBuf>,
        link_targets: HashMap<PathBuf, PathBuf>,
    }

    impl MockFileSystem {
        fn dir(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
            self.dirs.insert(
                PathBuf::from(path),
                entries.iter().map(|(n, k)| (n.to_string(), *k)).collect(),
            );
            self
        }

        fn size(mut self, path: &str, size: u64) -> Self {
            self.sizes.insert(PathBuf::from(path), size);
            self
        }

        fn resolve(&self, path: &Path) -> PathBuf {
            self.link_targets
                .get(path)
                .cloned()
                .unwrap_or_else(|| path.to_path_buf())
        }
    }

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "no such entry")
    }

    impl FileSystemSource for MockFileSystem {
        fn resolved_kind_of(&self, path: &Path) -> io::Result<EntryKind> {
            let path = self.resolve(path);
            if self.dirs.contains_key(&path) {
                Ok(EntryKind::Directory)
            } else if self.sizes.contains_key(&path) || self.unreadable_sizes.contains(&path) {
                Ok(EntryKind::File)
            } else {
                Err(not_found())
            }
        }

        fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>> {
            if self.unlistable.iter().any(|p| p == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            let entries = self.dirs.get(&self.resolve(path)).ok_or_else(not_found)?;
            let mut listing: Vec<io::Result<RawEntry>> = entries
                .iter()
                .map(|(name, kind)| {
                    Ok(RawEntry {
                        name: name.clone(),
                        path: path.join(name),
                        kind: *kind,
                    })
                })
                .collect();
            if self.broken_entries_in.iter().any(|p| p == path) {
                listing.push(Err(io::Error::other("entry vanished")));
            }
            Ok(listing)
        }

        fn file_size(&self, path: &Path) -> io::Result<u64> {
            if self.unreadable_sizes.iter().any(|p| p == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.sizes.get(path).copied().ok_or_else(not_found)
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(self.resolve(path))
        }
    }

    fn scanner(fs: MockFileSystem, settings: ScanSettings) -> TreeScanner {
        TreeScanner::new(settings).with_source(Box::new(fs))
    }

    #[test]
    fn test_listing_order_is_preserved() {
        let fs = MockFileSystem::default()
            .dir(
                "/r",
                &[
                    ("z.txt", EntryKind::File),
                    ("m", EntryKind::Directory),
                    ("a.txt", EntryKind::File),
                ],
            )
            .dir("/r/m", &[])
            .size("/r/z.txt", 1)
            .size("/r/a.txt", 2);

        let outcome = scanner(fs, ScanSettings::default()).scan(Path::new("/r"));
        let names: Vec<&str> = outcome.root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["z.txt", "m", "a.txt"]);
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_sort_entries_orders_by_name() {
        let fs = MockFileSystem::default()
            .dir("/r", &[("b", EntryKind::File), ("a", EntryKind::File)])
            .size("/r/a", 0)
            .size("/r/b", 0);
        let settings = ScanSettings {
            sort_entries: true,
            ..Default::default()
        };

        let outcome = scanner(fs, settings).scan(Path::new("/r"));
        assert_eq!(outcome.root.children()[0].name(), "a");
    }

    #[test]
    fn test_unreadable_size_keeps_entry() {
        let mut fs = MockFileSystem::default()
            .dir("/r", &[("locked.bin", EntryKind::File)]);
        fs.unreadable_sizes.push(PathBuf::from("/r/locked.bin"));

        let outcome = scanner(fs, ScanSettings::default()).scan(Path::new("/r"));
        let file = outcome.root.children()[0].as_file().unwrap();
        assert_eq!(file.name(), "locked.bin");
        assert_eq!(file.size(), None);
        assert!(matches!(
            outcome.report.outcome_for(Path::new("/r/locked.bin")),
            Some(EntryOutcome::AddedWithoutSize { .. })
        ));
        assert_eq!(outcome.summary().unknown_sizes, 1);
    }

    #[test]
    fn test_unlistable_subdirectory_is_omitted() {
        let mut fs = MockFileSystem::default()
            .dir(
                "/r",
                &[("secret", EntryKind::Directory), ("ok.txt", EntryKind::File)],
            )
            .dir("/r/secret", &[])
            .size("/r/ok.txt", 7);
        fs.unlistable.push(PathBuf::from("/r/secret"));

        let outcome = scanner(fs, ScanSettings::default()).scan(Path::new("/r"));
        assert_eq!(outcome.root.child_count(), 1);
        assert_eq!(outcome.root.children()[0].name(), "ok.txt");
        assert!(matches!(
            outcome.report.outcome_for(Path::new("/r/secret")),
            Some(EntryOutcome::SkippedError { .. })
        ));
    }

    #[test]
    fn test_broken_listing_entry_does_not_abort() {
        let mut fs = MockFileSystem::default()
            .dir("/r", &[("a", EntryKind::File)])
            .size("/r/a", 3);
        fs.broken_entries_in.push(PathBuf::from("/r"));

        let outcome = scanner(fs, ScanSettings::default()).scan(Path::new("/r"));
        assert_eq!(outcome.root.child_count(), 1);
        assert_eq!(outcome.summary().skipped_errors, 1);
    }

    #[test]
    fn test_special_files_and_links_are_skipped() {
        let mut fs = MockFileSystem::default()
            .dir(
                "/r",
                &[("pipe", EntryKind::Other), ("link", EntryKind::Symlink)],
            )
            .dir("/target", &[]);
        fs.link_targets
            .insert(PathBuf::from("/r/link"), PathBuf::from("/target"));
        let recorder = RecordingObserver::new();

        let outcome = scanner(fs, ScanSettings::default())
            .with_observer(Box::new(recorder.clone()))
            .scan(Path::new("/r"));

        assert!(outcome.root.is_empty());
        assert_eq!(outcome.report.skipped().count(), 2);
        assert_eq!(recorder.entries().len(), 2);
    }

    #[test]
    fn test_followed_symlink_cycle_is_cut() {
        let mut fs = MockFileSystem::default()
            .dir("/r", &[("sub", EntryKind::Directory)])
            .dir("/r/sub", &[("back", EntryKind::Symlink)]);
        fs.link_targets
            .insert(PathBuf::from("/r/sub/back"), PathBuf::from("/r"));
        let settings = ScanSettings {
            follow_symlinks: true,
            ..Default::default()
        };

        let outcome = scanner(fs, settings).scan(Path::new("/r"));
        let sub = outcome.root.children()[0].as_directory().unwrap();
        assert!(sub.is_empty());
        assert_eq!(
            outcome.report.outcome_for(Path::new("/r/sub/back")),
            Some(&EntryOutcome::SkippedError {
                reason: "symlink cycle".to_string()
            })
        );
    }

    #[test]
    fn test_max_depth_truncates() {
        let fs = MockFileSystem::default()
            .dir("/r", &[("a", EntryKind::Directory)])
            .dir("/r/a", &[("b", EntryKind::Directory)])
            .dir("/r/a/b", &[("deep.txt", EntryKind::File)])
            .size("/r/a/b/deep.txt", 1);
        let settings = ScanSettings {
            max_depth: Some(2),
            ..Default::default()
        };

        let outcome = scanner(fs, settings).scan(Path::new("/r"));
        let b = outcome.root.find(&["a", "b"]).unwrap().as_directory().unwrap();
        assert!(b.is_empty());
        assert_eq!(
            outcome.report.outcome_for(Path::new("/r/a/b")),
            Some(&EntryOutcome::Truncated { depth: 2 })
        );
        assert_eq!(outcome.summary().truncated, 1);
    }

    #[test]
    fn test_missing_root_notifies_observer() {
        let recorder = RecordingObserver::new();
        let outcome = scanner(MockFileSystem::default(), ScanSettings::default())
            .with_observer(Box::new(recorder.clone()))
            .scan(Path::new("/nowhere"));

        assert!(outcome.root.is_empty());
        assert_eq!(outcome.root.name(), "nowhere");
        assert!(outcome.report.root_error.is_some());
        assert_eq!(recorder.unavailable_roots(), vec![PathBuf::from("/nowhere")]);
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let fs = MockFileSystem::default().size("/file.txt", 4);
        let outcome = scanner(fs, ScanSettings::default()).scan(Path::new("/file.txt"));
        assert!(outcome.root.is_empty());
        assert_eq!(outcome.report.root_error.as_deref(), Some("not a directory"));
    }
}
