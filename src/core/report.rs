use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What happened to a single entry met during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum EntryOutcome {
    /// Entry was placed in the tree.
    Added,
    /// A regular file was placed in the tree, but its size could not be read.
    AddedWithoutSize { reason: String },
    /// Entry is neither a regular file nor a directory we descend into.
    SkippedUnsupported { kind: String },
    /// Entry could not be inspected and was left out.
    SkippedError { reason: String },
    /// Directory was placed in the tree without its contents because the
    /// depth limit was reached.
    Truncated { depth: usize },
}

impl EntryOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            EntryOutcome::SkippedUnsupported { .. } | EntryOutcome::SkippedError { .. }
        )
    }

    pub fn is_problem(&self) -> bool {
        !matches!(self, EntryOutcome::Added)
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Added => write!(f, "added"),
            EntryOutcome::AddedWithoutSize { reason } => {
                write!(f, "added with unknown size: {reason}")
            }
            EntryOutcome::SkippedUnsupported { kind } => write!(f, "skipped, unknown type ({kind})"),
            EntryOutcome::SkippedError { reason } => write!(f, "skipped: {reason}"),
            EntryOutcome::Truncated { depth } => write!(f, "not descended, depth limit {depth}"),
        }
    }
}

/// One line of the scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

/// Counters derived from a [`ScanReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files: usize,
    pub directories: usize,
    pub total_bytes: u64,
    pub unknown_sizes: usize,
    pub skipped_unsupported: usize,
    pub skipped_errors: usize,
    pub truncated: usize,
}

/// Every outcome recorded during one scan, in the order entries were met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,
    /// Set when the root itself could not be listed. The tree is empty then.
    pub root_error: Option<String>,
    pub entries: Vec<EntryRecord>,
}

impl ScanReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            root_error: None,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, path: PathBuf, outcome: EntryOutcome) {
        self.entries.push(EntryRecord { path, outcome });
    }

    pub fn problems(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.iter().filter(|e| e.outcome.is_problem())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.iter().filter(|e| e.outcome.is_skipped())
    }

    pub fn is_clean(&self) -> bool {
        self.root_error.is_none() && self.problems().next().is_none()
    }

    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&EntryOutcome> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.outcome)
    }
}
