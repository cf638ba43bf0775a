// src/engine/orchestrator.rs

//! Sequential run loop over the copy engine.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::errors::BackupError;
use crate::exec::CopyEngine;
use crate::status::StatusLog;
use crate::task::BackupTask;

use super::progress::ProgressBoard;

/// Shared single-flight run guard.
///
/// Raised for the duration of a run's sequential loop and lowered after.
/// The orchestrator owns the raising and lowering; the boundary holds a
/// clone so it can observe (and refuse to start) a run while one is active.
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }
}

/// Drives one run (all tasks or a single task) against the copy engine.
///
/// Per run: the status log and progress board are reset, the run flag is
/// raised for the duration of the strictly sequential loop, and every task
/// attempted produces exactly one status entry, in task order. A failing
/// task never aborts the rest of the batch.
///
/// State machine per run: Idle → Running → Idle. There is no cancellation
/// and no timeout; a hung copy call blocks the remainder of the run.
pub struct Orchestrator<E: CopyEngine> {
    engine: E,
    flag: RunFlag,
}

impl<E: CopyEngine> fmt::Debug for Orchestrator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("backing_up", &self.flag.get())
            .finish_non_exhaustive()
    }
}

impl<E: CopyEngine> Orchestrator<E> {
    pub fn new(engine: E, flag: RunFlag) -> Self {
        Self { engine, flag }
    }

    /// Whether a run is currently active.
    pub fn is_backing_up(&self) -> bool {
        self.flag.get()
    }

    /// Execute every task in `tasks`, in order, one at a time.
    pub async fn run_all(
        &mut self,
        tasks: &[BackupTask],
        status: &mut StatusLog,
        progress: &ProgressBoard,
    ) {
        self.begin_run(status, progress);
        info!(count = tasks.len(), "starting backup run");

        for task in tasks {
            self.run_task(task, status).await;
        }

        self.flag.set(false);
        info!("backup run finished");
    }

    /// Execute exactly one task.
    ///
    /// The status log and progress board are still reset for the whole run,
    /// not just this task's entries: status and progress are presented
    /// per-run, not cumulatively across runs.
    pub async fn run_single(
        &mut self,
        task: &BackupTask,
        status: &mut StatusLog,
        progress: &ProgressBoard,
    ) {
        self.begin_run(status, progress);
        info!(task = %task.name, "starting single-task backup run");

        self.run_task(task, status).await;

        self.flag.set(false);
        info!("backup run finished");
    }

    fn begin_run(&mut self, status: &mut StatusLog, progress: &ProgressBoard) {
        status.clear();
        progress.clear();
        self.flag.set(true);
    }

    async fn run_task(&mut self, task: &BackupTask, status: &mut StatusLog) {
        let result = self
            .engine
            .copy(
                task.source.clone(),
                task.destination.clone(),
                task.name.clone(),
            )
            .await;

        match result {
            Ok(message) => {
                info!(task = %task.name, "task succeeded");
                status.push(message);
            }
            Err(err) => {
                warn!(task = %task.name, %err, "task failed; continuing with the rest of the run");
                status.push(
                    BackupError::Engine {
                        task: task.name.clone(),
                        cause: err.to_string(),
                    }
                    .to_string(),
                );
            }
        }
    }
}
