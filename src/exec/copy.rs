// src/exec/copy.rs

//! Filesystem copy engine.
//!
//! Checks the source, creates the destination, counts the files up front,
//! then copies the tree recursively while reporting
//! `(task, copied, total, percent)` on the progress channel. The copy
//! itself is blocking filesystem work and runs on the blocking pool.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::{Context, anyhow};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::ProgressEvent;
use crate::errors::{BackupError, Result};

use super::CopyEngine;

/// Production copy engine backed by `std::fs`.
pub struct FsCopyEngine {
    progress_tx: mpsc::Sender<ProgressEvent>,
}

impl FsCopyEngine {
    pub fn new(progress_tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { progress_tx }
    }
}

impl CopyEngine for FsCopyEngine {
    fn copy(
        &mut self,
        source: String,
        destination: String,
        task_name: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let tx = self.progress_tx.clone();

        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                copy_directory(&source, &destination, &task_name, &tx)
            })
            .await
            .map_err(|e| BackupError::Other(anyhow!("copy worker panicked: {e}")))?
        })
    }
}

fn copy_directory(
    source: &str,
    destination: &str,
    task: &str,
    tx: &mpsc::Sender<ProgressEvent>,
) -> Result<String> {
    let source_path = Path::new(source);
    let destination_path = Path::new(destination);

    if !source_path.is_dir() {
        return Err(BackupError::Other(anyhow!(
            "source folder '{source}' does not exist or is not a directory"
        )));
    }

    fs::create_dir_all(destination_path)
        .with_context(|| format!("creating destination folder '{destination}'"))?;

    let total = count_files(source_path)?;
    debug!(task, total, "counted source files");

    let mut copied = 0u64;
    copy_recursive(source_path, destination_path, task, total, &mut copied, tx)?;

    info!(task, copied, total, "copy finished");
    Ok(format!(
        "Task '{task}' completed: copied {copied} files from '{source}' to '{destination}'"
    ))
}

fn count_files(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("reading dir {dir:?}"))? {
        let path = entry?.path();
        if path.is_dir() {
            total += count_files(&path)?;
        } else {
            total += 1;
        }
    }
    Ok(total)
}

fn copy_recursive(
    source: &Path,
    destination: &Path,
    task: &str,
    total: u64,
    copied: &mut u64,
    tx: &mpsc::Sender<ProgressEvent>,
) -> Result<()> {
    for entry in fs::read_dir(source).with_context(|| format!("reading dir {source:?}"))? {
        let entry = entry?;
        let entry_path = entry.path();
        let dest_path = destination.join(entry.file_name());

        if entry_path.is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("creating dir {dest_path:?}"))?;
            copy_recursive(&entry_path, &dest_path, task, total, copied, tx)?;
        } else {
            fs::copy(&entry_path, &dest_path)
                .with_context(|| format!("copying {entry_path:?} to {dest_path:?}"))?;
            *copied += 1;

            let percent = if total == 0 {
                100.0
            } else {
                *copied as f64 * 100.0 / total as f64
            };

            // A closed channel means nobody is listening any more; the copy
            // itself still has to finish.
            let _ = tx.blocking_send(ProgressEvent {
                task: task.to_string(),
                copied_files: *copied,
                total_files: total,
                percent,
            });
        }
    }

    Ok(())
}
