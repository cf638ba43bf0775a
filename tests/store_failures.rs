// tests/store_failures.rs

//! Store failure policies: every failure degrades to a status entry, and
//! the divergence policy differs per operation (documented in DESIGN.md):
//! `add` never installs the optimistic append, `delete` keeps the local
//! removal.

use std::error::Error;
use std::sync::{Arc, Mutex};

use backrun::engine::{BackupSession, ProgressBoard};
use backrun::errors::BackupError;
use backrun_test_utils::builders::{draft, task};
use backrun_test_utils::fakes::{FakeCopyEngine, MemoryTaskStore};
use backrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

async fn session_over(store: MemoryTaskStore) -> BackupSession<MemoryTaskStore, FakeCopyEngine> {
    let engine = FakeCopyEngine::new(Arc::new(Mutex::new(Vec::new())));
    BackupSession::init(store, engine, ProgressBoard::new()).await
}

#[tokio::test]
async fn load_failure_leaves_local_list_untouched_and_appends_status() {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a")]);
    store.fail_load(true);

    let session = session_over(store).await;

    // The initial load failed, so the session saw no tasks; no retry.
    assert!(session.tasks().is_empty());
    assert_eq!(session.status().len(), 1);
    assert!(session.status()[0].starts_with("Failed to load tasks:"));
}

#[tokio::test]
async fn add_save_failure_keeps_list_unchanged_and_rethrows() {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a")]);
    let mut session = session_over(store.clone()).await;
    store.fail_save(true);

    let err = session
        .add_task(draft("b", "/src/b", "/dst/b"))
        .await
        .unwrap_err();

    // Rethrown so the caller can keep its input form populated.
    assert!(matches!(err, BackupError::Store(_)));
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(store.stored().len(), 1);
    assert_eq!(session.status().len(), 1);
    assert!(session.status()[0].starts_with("Task 'b' not added:"));
}

#[tokio::test]
async fn delete_save_failure_keeps_the_local_removal() -> TestResult {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a"), task("b")]);
    let mut session = session_over(store.clone()).await;
    store.fail_save(true);

    let removed = session.delete_task(0).await?;

    assert_eq!(removed, "a");
    // Local state diverges from the store: removal kept, store untouched.
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].name, "b");
    assert_eq!(store.stored().len(), 2);
    assert_eq!(session.status().len(), 1);
    assert!(session.status()[0].starts_with("Task 'a' removed, but saving failed:"));
    Ok(())
}

#[tokio::test]
async fn delete_all_save_failure_still_clears_locally() {
    init_tracing();

    let store = MemoryTaskStore::with_tasks(vec![task("a"), task("b")]);
    let mut session = session_over(store.clone()).await;
    store.fail_save(true);

    session.delete_all_tasks().await;

    assert!(session.tasks().is_empty());
    assert_eq!(store.stored().len(), 2);
    assert_eq!(session.status().len(), 1);
    assert!(session.status()[0].starts_with("Failed to clear stored tasks:"));
}
