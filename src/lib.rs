// src/lib.rs

pub mod cli;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod status;
pub mod store;
pub mod task;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::engine::{BackupSession, ProgressBoard, ProgressEvent, RunFlag, spawn_progress_sync};
use crate::exec::FsCopyEngine;
use crate::store::FileTaskStore;
use crate::task::TaskDraft;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the TOML task store
/// - the filesystem copy engine and its progress channel
/// - the progress synchronizer
/// - the backup session
pub async fn run(args: CliArgs) -> Result<()> {
    let store_path = args.store.clone().unwrap_or_else(FileTaskStore::default_path);

    if matches!(args.command, Command::StorePath) {
        println!("{}", store_path.display());
        return Ok(());
    }

    let store = FileTaskStore::new(store_path);

    // Progress event channel: engine → synchronizer → shared board.
    let (progress_tx, progress_rx) = mpsc::channel::<ProgressEvent>(64);
    let board = ProgressBoard::new();
    let _sync_handle = spawn_progress_sync(progress_rx, board.clone());

    let engine = FsCopyEngine::new(progress_tx);
    let mut session = BackupSession::init(store, engine, board.clone()).await;

    match args.command {
        Command::Add {
            name,
            source,
            destination,
        } => {
            let result = session
                .add_task(TaskDraft::new(name, source, destination))
                .await;
            print_status(&session);
            result?;
        }
        Command::List => {
            if session.tasks().is_empty() {
                println!("no tasks defined");
            }
            for (index, task) in session.tasks().iter().enumerate() {
                println!(
                    "{index}: {} ({} -> {})",
                    task.name, task.source, task.destination
                );
            }
        }
        Command::Delete { index } => {
            let name = session.delete_task(index).await?;
            info!(task = %name, "task deleted");
            print_status(&session);
        }
        Command::Clear => {
            session.delete_all_tasks().await;
            print_status(&session);
        }
        Command::Run { index } => {
            let reporter = spawn_progress_reporter(board, session.run_flag());

            match index {
                Some(i) => session.run_single(i).await?,
                None => session.run_all().await?,
            }

            reporter.abort();
            print_status(&session);
        }
        Command::StorePath => {
            // Handled before the session was built.
        }
    }

    Ok(())
}

fn print_status<S, E>(session: &BackupSession<S, E>)
where
    S: crate::store::TaskStore,
    E: crate::exec::CopyEngine,
{
    for entry in session.status() {
        println!("{entry}");
    }
}

/// Periodically log per-task progress while a run is active.
fn spawn_progress_reporter(board: ProgressBoard, flag: RunFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(500));
        loop {
            ticker.tick().await;
            if !flag.get() {
                continue;
            }
            for (name, snap) in board.snapshot() {
                info!(
                    task = %name,
                    copied = snap.copied_files,
                    total = snap.total_files,
                    percent = %format!("{:.1}", snap.percent),
                    "progress"
                );
            }
        }
    })
}
