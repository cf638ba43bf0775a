// tests/run_outcomes.rs

//! Run semantics: ordering, partial-failure isolation, per-run resets, and
//! the single-flight guard at the session boundary.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use backrun::engine::{BackupSession, ProgressBoard, ProgressSnapshot, RunFlag};
use backrun::errors::{BackupError, Result as BackupResult};
use backrun::exec::CopyEngine;
use backrun_test_utils::builders::{TaskBuilder, task};
use backrun_test_utils::fakes::{FakeCopyEngine, MemoryTaskStore};
use backrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn stale_entry() -> ProgressSnapshot {
    ProgressSnapshot {
        copied_files: 9,
        total_files: 9,
        percent: 100.0,
    }
}

#[tokio::test]
async fn run_all_mixed_outcomes_keeps_order_and_isolates_failures() -> TestResult {
    init_tracing();

    let tasks = vec![
        TaskBuilder::new("A").source("src1").destination("dst1").build(),
        TaskBuilder::new("B").source("src2").destination("dst2").build(),
    ];
    let store = MemoryTaskStore::with_tasks(tasks);
    let board = ProgressBoard::new();

    let invoked = Arc::new(Mutex::new(Vec::new()));
    let engine = FakeCopyEngine::new(invoked.clone())
        .ok("A", "ok:A")
        .fail("B", "disk full");

    let mut session = BackupSession::init(store, engine, board.clone()).await;

    // Leftover progress from an earlier run must be cleared at run start.
    board.upsert("A".to_string(), stale_entry());

    session.run_all().await?;

    assert_eq!(
        session.status(),
        ["ok:A", "Error in task \"B\": disk full"]
    );
    assert_eq!(session.tasks().len(), 2);
    assert_eq!(*invoked.lock().unwrap(), ["A", "B"]);
    // The fake engine emits no events, so the board stays empty after the
    // run-start reset.
    assert!(board.is_empty());
    assert!(!session.is_backing_up());
    Ok(())
}

#[tokio::test]
async fn run_all_produces_one_entry_per_task_even_when_all_fail() -> TestResult {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a"), task("b"), task("c")]);
    let invoked = Arc::new(Mutex::new(Vec::new()));
    let engine = FakeCopyEngine::new(invoked.clone())
        .fail("a", "nope")
        .fail("b", "nope")
        .fail("c", "nope");

    let mut session = BackupSession::init(store, engine, ProgressBoard::new()).await;
    session.run_all().await?;

    assert_eq!(session.status().len(), 3);
    assert_eq!(*invoked.lock().unwrap(), ["a", "b", "c"]);
    for (entry, name) in session.status().iter().zip(["a", "b", "c"]) {
        assert_eq!(entry, &format!("Error in task \"{name}\": nope"));
    }
    Ok(())
}

#[tokio::test]
async fn run_single_resets_the_full_status_log_and_progress_map() -> TestResult {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a"), task("b")]);
    let board = ProgressBoard::new();
    let invoked = Arc::new(Mutex::new(Vec::new()));
    let engine = FakeCopyEngine::new(invoked.clone());

    let mut session = BackupSession::init(store, engine, board.clone()).await;

    // Simulate leftovers from a previous full run.
    session.run_all().await?;
    board.upsert("a".to_string(), stale_entry());
    assert_eq!(session.status().len(), 2);

    session.run_single(1).await?;

    assert_eq!(session.status(), ["done: b"]);
    assert!(board.get("a").is_none());
    assert_eq!(*invoked.lock().unwrap(), ["a", "b", "b"]);
    Ok(())
}

#[tokio::test]
async fn run_single_with_bad_index_is_an_error() {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a")]);
    let engine = FakeCopyEngine::new(Arc::new(Mutex::new(Vec::new())));
    let mut session = BackupSession::init(store, engine, ProgressBoard::new()).await;

    let err = session.run_single(3).await.unwrap_err();
    assert!(matches!(err, BackupError::TaskIndex(3)));
}

#[tokio::test]
async fn overlapping_run_is_rejected_not_silently_duplicated() -> TestResult {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a")]);
    let invoked = Arc::new(Mutex::new(Vec::new()));
    let engine = FakeCopyEngine::new(invoked.clone());
    let mut session = BackupSession::init(store, engine, ProgressBoard::new()).await;

    // The boundary observes an active run via the shared flag.
    let flag = session.run_flag();
    flag.set(true);

    assert!(matches!(
        session.run_all().await,
        Err(BackupError::RunInProgress)
    ));
    assert!(matches!(
        session.run_single(0).await,
        Err(BackupError::RunInProgress)
    ));
    assert!(invoked.lock().unwrap().is_empty());

    flag.set(false);
    session.run_all().await?;
    assert_eq!(*invoked.lock().unwrap(), ["a"]);
    Ok(())
}

/// Engine double that records the run flag's value while each copy is in
/// flight. The flag slot is filled in after the session exists.
struct FlagProbeEngine {
    flag: Arc<Mutex<Option<RunFlag>>>,
    seen: Arc<Mutex<Vec<bool>>>,
}

impl CopyEngine for FlagProbeEngine {
    fn copy(
        &mut self,
        _source: String,
        _destination: String,
        task_name: String,
    ) -> Pin<Box<dyn Future<Output = BackupResult<String>> + Send + '_>> {
        let flag = Arc::clone(&self.flag);
        let seen = Arc::clone(&self.seen);

        Box::pin(async move {
            let active = flag
                .lock()
                .unwrap()
                .as_ref()
                .expect("probe flag not wired")
                .get();
            seen.lock().unwrap().push(active);
            Ok(format!("done: {task_name}"))
        })
    }
}

#[tokio::test]
async fn run_flag_is_raised_for_the_whole_loop_and_lowered_after() -> TestResult {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a"), task("b")]);
    let flag_slot = Arc::new(Mutex::new(None));
    let flag_seen = Arc::new(Mutex::new(Vec::new()));

    let engine = FlagProbeEngine {
        flag: Arc::clone(&flag_slot),
        seen: Arc::clone(&flag_seen),
    };
    let mut session = BackupSession::init(store, engine, ProgressBoard::new()).await;
    *flag_slot.lock().unwrap() = Some(session.run_flag());

    assert!(!session.is_backing_up());
    session.run_all().await?;
    assert!(!session.is_backing_up());

    // The flag was observed raised during both sequential copy calls.
    assert_eq!(*flag_seen.lock().unwrap(), [true, true]);
    Ok(())
}
