// src/exec/mod.rs

//! Copy engine abstraction.
//!
//! The orchestrator talks to a [`CopyEngine`] instead of a concrete copy
//! implementation. This makes it easy to script per-task outcomes in tests
//! while keeping the real filesystem engine in [`copy`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub mod copy;

pub use copy::FsCopyEngine;

/// Trait abstracting how a single backup task is executed.
///
/// Implementations may emit zero or more progress events on a separate
/// channel while running; the returned string is a human-readable success
/// message for the status log.
pub trait CopyEngine: Send {
    fn copy(
        &mut self,
        source: String,
        destination: String,
        task_name: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}
