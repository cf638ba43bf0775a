// src/engine/registry.rs

//! Canonical in-memory task list, reconciled against the task store.

use tracing::{debug, warn};

use crate::errors::{BackupError, Result};
use crate::status::StatusLog;
use crate::store::TaskStore;
use crate::task::{BackupTask, TaskDraft};

use super::TaskName;

/// Owns the task list and mediates every store call.
///
/// The store stays the source of truth: after every successful save on the
/// add path, the full list is reloaded and installed wholesale instead of
/// trusting the local mutation.
#[derive(Debug)]
pub struct TaskRegistry<S: TaskStore> {
    store: S,
    tasks: Vec<BackupTask>,
}

impl<S: TaskStore> TaskRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[BackupTask] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&BackupTask> {
        self.tasks.get(index)
    }

    /// Fetch the full task list from the store.
    ///
    /// On failure the current local list is left untouched and the failure
    /// becomes a status entry; there is no retry.
    pub async fn load(&mut self, status: &mut StatusLog) {
        match self.store.load().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded task list from store");
                self.tasks = tasks;
            }
            Err(err) => {
                warn!(%err, "failed to load task list");
                status.push(format!("Failed to load tasks: {err}"));
            }
        }
    }

    /// Validate `draft` and persist it.
    ///
    /// The new task only becomes visible via the store: the extended list
    /// is saved, then the canonical list is reloaded and installed. A
    /// validation failure makes no store call at all. A store failure
    /// leaves the visible list unchanged and is both logged as a status
    /// entry and returned, so the caller can keep its input form populated.
    pub async fn add(&mut self, draft: TaskDraft, status: &mut StatusLog) -> Result<()> {
        let task = match draft.validate() {
            Ok(task) => task,
            Err(err) => {
                status.push(format!("Error: {err}"));
                return Err(err);
            }
        };
        let name = task.name.clone();

        let mut next = self.tasks.clone();
        next.push(task);

        match self.persist_and_reload(next).await {
            Ok(()) => {
                debug!(task = %name, "task added and reconciled");
                status.push(format!("Task '{name}' added"));
                Ok(())
            }
            Err(err) => {
                warn!(task = %name, %err, "failed to persist new task");
                status.push(format!("Task '{name}' not added: {err}"));
                Err(err)
            }
        }
    }

    /// Remove the task at `index`, returning its name so the caller can
    /// cascade the progress-map cleanup.
    ///
    /// The local removal is kept even when persisting the shorter list
    /// fails; the failure only becomes a status entry. Locally consistent,
    /// not store-guaranteed consistent.
    pub async fn delete(&mut self, index: usize, status: &mut StatusLog) -> Result<TaskName> {
        if index >= self.tasks.len() {
            return Err(BackupError::TaskIndex(index));
        }

        let removed = self.tasks.remove(index);
        let name = removed.name;
        debug!(task = %name, index, "removed task locally");

        if let Err(err) = self.store.save(self.tasks.clone()).await {
            warn!(task = %name, %err, "failed to persist task deletion");
            status.push(format!("Task '{name}' removed, but saving failed: {err}"));
        }

        Ok(name)
    }

    /// Drop every task and persist the empty list.
    pub async fn delete_all(&mut self, status: &mut StatusLog) {
        self.tasks.clear();

        if let Err(err) = self.store.save(Vec::new()).await {
            warn!(%err, "failed to persist empty task list");
            status.push(format!("Failed to clear stored tasks: {err}"));
        }
    }

    async fn persist_and_reload(&mut self, next: Vec<BackupTask>) -> Result<()> {
        self.store.save(next).await?;

        // Reconcile: the store's answer replaces the local list wholesale.
        self.tasks = self.store.load().await?;
        Ok(())
    }
}
