// src/engine/progress.rs

//! Live progress map fed by the copy engine's event channel.
//!
//! A dedicated task consumes the channel and performs only the upsert.
//! Last-write-wins: the channel gives no ordering guarantee relative to
//! copy-call completion, so an out-of-order percent may overwrite a higher
//! one. That is accepted behaviour, not corrected here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{ProgressEvent, TaskName};

/// Most recently received progress tuple for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub copied_files: u64,
    pub total_files: u64,
    pub percent: f64,
}

/// Shared task-name → snapshot map.
///
/// Cloning shares the underlying map. Entries are created lazily on the
/// first event for a name, replaced wholesale on each subsequent event,
/// removed when the owning task is deleted, and cleared at run start.
#[derive(Debug, Clone, Default)]
pub struct ProgressBoard {
    inner: Arc<Mutex<HashMap<TaskName, ProgressSnapshot>>>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `task` wholesale (upsert, not a merge).
    pub fn upsert(&self, task: TaskName, snapshot: ProgressSnapshot) {
        self.inner.lock().unwrap().insert(task, snapshot);
    }

    /// Cascade from a task deletion.
    pub fn remove(&self, task: &str) {
        self.inner.lock().unwrap().remove(task);
    }

    /// Full reset at run start or delete-all.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn get(&self, task: &str) -> Option<ProgressSnapshot> {
        self.inner.lock().unwrap().get(task).cloned()
    }

    pub fn snapshot(&self) -> HashMap<TaskName, ProgressSnapshot> {
        self.inner.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Handle to the spawned progress synchronizer.
///
/// Dropping the handle releases the subscription; events delivered after
/// that are lost, no buffering is attempted.
#[derive(Debug)]
pub struct ProgressSyncHandle {
    join: JoinHandle<()>,
}

impl Drop for ProgressSyncHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Spawn the synchronizer: a dedicated task folding every event from
/// `events` into `board` until the channel closes.
pub fn spawn_progress_sync(
    mut events: mpsc::Receiver<ProgressEvent>,
    board: ProgressBoard,
) -> ProgressSyncHandle {
    let join = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(
                task = %event.task,
                copied = event.copied_files,
                total = event.total_files,
                percent = event.percent,
                "progress event"
            );

            board.upsert(
                event.task.clone(),
                ProgressSnapshot {
                    copied_files: event.copied_files,
                    total_files: event.total_files,
                    percent: event.percent,
                },
            );
        }

        debug!("progress channel closed; synchronizer exiting");
    });

    ProgressSyncHandle { join }
}
