use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::core::report::EntryOutcome;

/// Diagnostic channel the scanner reports into as it walks.
///
/// The scanner takes its observer as an explicit collaborator. Callers that do
/// not care pass [`NullObserver`]; there is no shared global instance.
pub trait ScanObserver {
    /// Called for every entry, right after its outcome is decided.
    fn on_entry(&self, path: &Path, outcome: &EntryOutcome);

    /// Called once when the scan root cannot be listed.
    fn on_root_unavailable(&self, root: &Path, reason: &str);
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScanObserver for NullObserver {
    fn on_entry(&self, _path: &Path, _outcome: &EntryOutcome) {}

    fn on_root_unavailable(&self, _root: &Path, _reason: &str) {}
}

/// Forwards outcomes to `tracing`: problems at warn level, the rest at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_entry(&self, path: &Path, outcome: &EntryOutcome) {
        if outcome.is_problem() {
            warn!(path = %path.display(), %outcome, "scan entry");
        } else {
            debug!(path = %path.display(), "added");
        }
    }

    fn on_root_unavailable(&self, root: &Path, reason: &str) {
        warn!(root = %root.display(), reason, "scan root unavailable, tree left empty");
    }
}

/// Keeps every notification in memory. Clones share the same buffer, so a
/// caller can hand one clone to the scanner and inspect the other afterwards.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<(PathBuf, Option<EntryOutcome>)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry notifications received so far.
    pub fn entries(&self) -> Vec<(PathBuf, EntryOutcome)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|(path, outcome)| outcome.clone().map(|o| (path.clone(), o)))
            .collect()
    }

    /// Roots reported as unavailable.
    pub fn unavailable_roots(&self) -> Vec<PathBuf> {
        self.events
            .borrow()
            .iter()
            .filter(|(_, outcome)| outcome.is_none())
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl ScanObserver for RecordingObserver {
    fn on_entry(&self, path: &Path, outcome: &EntryOutcome) {
        self.events
            .borrow_mut()
            .push((path.to_path_buf(), Some(outcome.clone())));
    }

    fn on_root_unavailable(&self, root: &Path, _reason: &str) {
        self.events.borrow_mut().push((root.to_path_buf(), None));
    }
}
