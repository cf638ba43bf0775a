// src/engine/session.rs

//! Composition layer exposed to the presentation boundary.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::{BackupError, Result};
use crate::exec::CopyEngine;
use crate::status::StatusLog;
use crate::store::TaskStore;
use crate::task::{BackupTask, TaskDraft};

use super::TaskName;
use super::orchestrator::{Orchestrator, RunFlag};
use super::progress::{ProgressBoard, ProgressSnapshot};
use super::registry::TaskRegistry;

/// Consistent read model handed to the presentation boundary.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub tasks: Vec<BackupTask>,
    pub progress: HashMap<TaskName, ProgressSnapshot>,
    pub status: Vec<String>,
    pub is_backing_up: bool,
}

/// Owns all orchestration state: the registry, the orchestrator, the shared
/// progress board, and the status log.
///
/// Every mutation flows through here, so the delete cascades and the
/// single-flight run guard live in one place. The session performs no IO
/// of its own beyond delegating to the registry and orchestrator.
pub struct BackupSession<S: TaskStore, E: CopyEngine> {
    registry: TaskRegistry<S>,
    orchestrator: Orchestrator<E>,
    progress: ProgressBoard,
    status: StatusLog,
    run_flag: RunFlag,
}

impl<S, E> BackupSession<S, E>
where
    S: TaskStore,
    E: CopyEngine,
{
    pub fn new(store: S, engine: E, progress: ProgressBoard) -> Self {
        let run_flag = RunFlag::new();
        Self {
            registry: TaskRegistry::new(store),
            orchestrator: Orchestrator::new(engine, run_flag.clone()),
            progress,
            status: StatusLog::new(),
            run_flag,
        }
    }

    /// Create the session and perform the initial load from the store.
    pub async fn init(store: S, engine: E, progress: ProgressBoard) -> Self {
        let mut session = Self::new(store, engine, progress);
        session.registry.load(&mut session.status).await;
        session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tasks: self.registry.tasks().to_vec(),
            progress: self.progress.snapshot(),
            status: self.status.entries().to_vec(),
            is_backing_up: self.run_flag.get(),
        }
    }

    pub fn tasks(&self) -> &[BackupTask] {
        self.registry.tasks()
    }

    pub fn status(&self) -> &[String] {
        self.status.entries()
    }

    pub fn is_backing_up(&self) -> bool {
        self.run_flag.get()
    }

    /// Clone of the shared run guard, for live observation by the boundary.
    pub fn run_flag(&self) -> RunFlag {
        self.run_flag.clone()
    }

    /// Clone of the shared progress board, for live rendering during a run.
    pub fn progress_board(&self) -> ProgressBoard {
        self.progress.clone()
    }

    /// Validate `draft` and persist it.
    ///
    /// On success the caller should clear its input form; on failure the
    /// error is surfaced so the form stays populated.
    pub async fn add_task(&mut self, draft: TaskDraft) -> Result<()> {
        self.registry.add(draft, &mut self.status).await
    }

    /// Remove the task at `index` and cascade: its progress entry goes too.
    pub async fn delete_task(&mut self, index: usize) -> Result<TaskName> {
        let name = self.registry.delete(index, &mut self.status).await?;
        self.progress.remove(&name);
        debug!(task = %name, "cascaded progress entry removal");
        Ok(name)
    }

    /// Drop every task; the status log and progress map are cleared too.
    pub async fn delete_all_tasks(&mut self) {
        self.status.clear();
        self.progress.clear();
        self.registry.delete_all(&mut self.status).await;
    }

    /// Run every task sequentially. Rejected while another run is active.
    pub async fn run_all(&mut self) -> Result<()> {
        if self.run_flag.get() {
            return Err(BackupError::RunInProgress);
        }

        let tasks = self.registry.tasks().to_vec();
        self.orchestrator
            .run_all(&tasks, &mut self.status, &self.progress)
            .await;
        Ok(())
    }

    /// Run exactly one task by index. Same guard and per-run reset.
    pub async fn run_single(&mut self, index: usize) -> Result<()> {
        if self.run_flag.get() {
            return Err(BackupError::RunInProgress);
        }

        let task = self
            .registry
            .get(index)
            .cloned()
            .ok_or(BackupError::TaskIndex(index))?;
        self.orchestrator
            .run_single(&task, &mut self.status, &self.progress)
            .await;
        Ok(())
    }
}
