// src/store/mod.rs

//! Pluggable task persistence.
//!
//! The registry talks to a [`TaskStore`] instead of a concrete backend.
//! This makes it easy to swap in an in-memory store in tests while keeping
//! the TOML file store as the production implementation.
//!
//! Both operations are treated as fallible remote calls: the registry
//! catches every failure and converts it into a status entry rather than
//! letting it escape the core.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{BackupError, Result};
use crate::task::BackupTask;

/// Trait abstracting where the task list is persisted.
///
/// Production code uses [`FileTaskStore`]; tests can provide their own
/// implementation with scriptable failures.
pub trait TaskStore: Send {
    /// Fetch the full task list.
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<BackupTask>>> + Send + '_>>;

    /// Replace the persisted task list wholesale.
    fn save(&self, tasks: Vec<BackupTask>)
    -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// On-disk shape of the store file.
///
/// Tasks live under `[[task]]` so the file reads like a plain TOML task
/// list and tolerates an empty file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    task: Vec<BackupTask>,
}

/// TOML file-backed task store.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    path: PathBuf,
}

impl FileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default store location: `backrun-tasks.toml` in the current working
    /// directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("backrun-tasks.toml")
    }
}

impl TaskStore for FileTaskStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<BackupTask>>> + Send + '_>> {
        Box::pin(async move {
            // A store file that does not exist yet is an empty task list,
            // not an error.
            if !tokio::fs::try_exists(&self.path).await? {
                debug!(path = %self.path.display(), "store file absent; empty task list");
                return Ok(Vec::new());
            }

            let contents = tokio::fs::read_to_string(&self.path).await?;
            let file: StoreFile = toml::from_str(&contents).map_err(|e| {
                BackupError::Store(format!("parsing {}: {e}", self.path.display()))
            })?;

            debug!(path = %self.path.display(), count = file.task.len(), "loaded store file");
            Ok(file.task)
        })
    }

    fn save(
        &self,
        tasks: Vec<BackupTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let file = StoreFile { task: tasks };
            let contents = toml::to_string_pretty(&file)
                .map_err(|e| BackupError::Store(format!("serializing task list: {e}")))?;

            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            tokio::fs::write(&self.path, contents).await?;
            debug!(path = %self.path.display(), "saved store file");
            Ok(())
        })
    }
}
