#![allow(dead_code)]

use backrun::task::{BackupTask, TaskDraft};

/// Shorthand for a task whose paths are derived from its name.
pub fn task(name: &str) -> BackupTask {
    BackupTask {
        name: name.to_string(),
        source: format!("/src/{name}"),
        destination: format!("/dst/{name}"),
    }
}

/// Shorthand for a valid draft.
pub fn draft(name: &str, source: &str, destination: &str) -> TaskDraft {
    TaskDraft::new(name, source, destination)
}

/// Builder for `BackupTask` to simplify test setup.
pub struct TaskBuilder {
    task: BackupTask,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self { task: task(name) }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.task.source = source.to_string();
        self
    }

    pub fn destination(mut self, destination: &str) -> Self {
        self.task.destination = destination.to_string();
        self
    }

    pub fn build(self) -> BackupTask {
        self.task
    }
}
