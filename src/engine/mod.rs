// src/engine/mod.rs

//! Orchestration engine for backrun.
//!
//! This module ties together:
//! - the task registry (canonical task list, reconciled against the store)
//! - the progress synchronizer (event channel → live snapshot map)
//! - the orchestrator (sequential run loop over the copy engine)
//! - the session (composition layer the presentation boundary talks to)

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// One progress report from the copy engine, keyed by task name.
///
/// Delivery order on the channel is the only ordering there is; events are
/// not deduplicated or staleness-checked downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub task: TaskName,
    pub copied_files: u64,
    pub total_files: u64,
    pub percent: f64,
}

pub mod orchestrator;
pub mod progress;
pub mod registry;
pub mod session;

pub use orchestrator::{Orchestrator, RunFlag};
pub use progress::{ProgressBoard, ProgressSnapshot, ProgressSyncHandle, spawn_progress_sync};
pub use registry::TaskRegistry;
pub use session::{BackupSession, SessionSnapshot};
