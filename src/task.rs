// src/task.rs

//! Backup task definitions.

use serde::{Deserialize, Serialize};

use crate::errors::{BackupError, Result};

/// A named source → destination backup job.
///
/// `name` is the task's identity: it is the join key against progress
/// records and the display key at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupTask {
    pub name: String,
    pub source: String,
    pub destination: String,
}

/// User-entered task fields, not yet validated.
///
/// The presentation boundary fills this from its input form; the registry
/// turns it into a [`BackupTask`] via [`TaskDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub source: String,
    pub destination: String,
}

impl TaskDraft {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// All three fields must be non-empty before a task may be created.
    pub fn validate(self) -> Result<BackupTask> {
        if self.name.is_empty() || self.source.is_empty() || self.destination.is_empty() {
            return Err(BackupError::EmptyField);
        }

        Ok(BackupTask {
            name: self.name,
            source: self.source,
            destination: self.destination,
        })
    }
}
