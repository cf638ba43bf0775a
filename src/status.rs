// src/status.rs

//! Ordered, append-only status log for the current run.

use tracing::debug;

/// Human-readable outcome log.
///
/// Holds one entry per task attempted in the current run, in task order,
/// plus ad-hoc operational messages (load/save failures). Fully reset at
/// the start of every run and at delete-all.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    entries: Vec<String>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        debug!(%entry, "status entry appended");
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
