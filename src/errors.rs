// src/errors.rs

//! Crate-wide error types.
//!
//! Every failure in the core degrades to a visible status entry; nothing in
//! here is fatal to the process. The variants mirror the three failure
//! classes the session deals with: invalid user input, task store failures,
//! and per-task copy engine failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    /// A task draft had an empty name, source, or destination.
    #[error("fill in all task fields")]
    EmptyField,

    /// The task store rejected a load or save.
    #[error("task store error: {0}")]
    Store(String),

    /// One task's copy failed. Formats exactly as the status entry the
    /// orchestrator appends for it.
    #[error("Error in task \"{task}\": {cause}")]
    Engine { task: String, cause: String },

    /// A run was requested while another run is active.
    #[error("a backup run is already in progress")]
    RunInProgress,

    /// An operation referenced a task index that does not exist.
    #[error("no task at index {0}")]
    TaskIndex(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BackupError>;
