use std::sync::Arc;

use tracing::debug;

use crate::editor::Edit;
use crate::models::ResumeData;

/// Holds the single live `ResumeData` of a session.
///
/// Updates are pure functions `old -> new`; the aggregate is replaced
/// wholesale, so a snapshot taken with `get_data` never observes a
/// half-applied edit.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    current: Arc<ResumeData>,
    revision: u64,
}

impl ResumeStore {
    pub fn new(initial: ResumeData) -> Self {
        ResumeStore {
            current: Arc::new(initial),
            revision: 0,
        }
    }

    pub fn get_data(&self) -> Arc<ResumeData> {
        Arc::clone(&self.current)
    }

    pub fn set_data<F>(&mut self, updater: F)
    where
        F: FnOnce(ResumeData) -> ResumeData,
    {
        let next = updater(ResumeData::clone(&self.current));
        self.current = Arc::new(next);
        self.revision += 1;
        debug!(revision = self.revision, "Resume data replaced");
    }

    /// Applies a typed editor command through `set_data`.
    pub fn apply(&mut self, edit: Edit) {
        self.set_data(|data| edit.apply(data));
    }

    /// Number of updates applied since the session started.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
