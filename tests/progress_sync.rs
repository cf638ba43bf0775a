// tests/progress_sync.rs

//! Progress synchronizer behaviour: lazy entry creation, wholesale upserts,
//! accepted out-of-order overwrites, and subscription teardown.

use std::error::Error;

use tokio::sync::mpsc;

use backrun::engine::{ProgressBoard, ProgressEvent, spawn_progress_sync};
use backrun_test_utils::{init_tracing, wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn event(task: &str, copied: u64, total: u64, percent: f64) -> ProgressEvent {
    ProgressEvent {
        task: task.to_string(),
        copied_files: copied,
        total_files: total,
        percent,
    }
}

#[tokio::test]
async fn events_fold_into_the_board_keyed_by_task_name() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let board = ProgressBoard::new();
    let _handle = spawn_progress_sync(rx, board.clone());

    // Entries are created lazily: nothing exists before the first event.
    assert!(board.is_empty());

    tx.send(event("alpha", 1, 10, 10.0)).await?;
    tx.send(event("beta", 5, 5, 100.0)).await?;
    tx.send(event("alpha", 6, 10, 60.0)).await?;

    wait_until(|| board.get("alpha").map(|s| s.percent) == Some(60.0)).await;

    let alpha = board.get("alpha").unwrap();
    assert_eq!(alpha.copied_files, 6);
    assert_eq!(alpha.total_files, 10);

    let beta = board.get("beta").unwrap();
    assert_eq!(beta.percent, 100.0);
    assert_eq!(board.len(), 2);
    Ok(())
}

#[tokio::test]
async fn last_write_wins_even_when_events_arrive_out_of_order() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let board = ProgressBoard::new();
    let _handle = spawn_progress_sync(rx, board.clone());

    tx.send(event("a", 8, 10, 80.0)).await?;
    tx.send(event("a", 3, 10, 30.0)).await?;

    // The later delivery overwrites the higher percent; no staleness check.
    wait_until(|| board.get("a").map(|s| s.percent) == Some(30.0)).await;
    assert_eq!(board.get("a").unwrap().copied_files, 3);
    Ok(())
}

#[tokio::test]
async fn dropping_the_handle_releases_the_subscription() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let board = ProgressBoard::new();
    let handle = spawn_progress_sync(rx, board.clone());

    tx.send(event("a", 1, 2, 50.0)).await?;
    wait_until(|| board.get("a").is_some()).await;

    drop(handle);
    // The receiver is gone once the synchronizer task is torn down.
    with_timeout(tx.closed()).await;

    // Updates fired while unsubscribed are lost, not buffered.
    assert!(tx.send(event("a", 2, 2, 100.0)).await.is_err());
    assert_eq!(board.get("a").unwrap().percent, 50.0);
    Ok(())
}

#[tokio::test]
async fn board_mutators_support_the_session_cascades() {
    init_tracing();

    let board = ProgressBoard::new();
    board.upsert(
        "a".to_string(),
        backrun::engine::ProgressSnapshot {
            copied_files: 1,
            total_files: 2,
            percent: 50.0,
        },
    );
    board.upsert(
        "b".to_string(),
        backrun::engine::ProgressSnapshot {
            copied_files: 2,
            total_files: 2,
            percent: 100.0,
        },
    );

    board.remove("a");
    assert!(board.get("a").is_none());
    assert!(board.get("b").is_some());

    board.clear();
    assert!(board.is_empty());
}
