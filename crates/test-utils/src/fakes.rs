use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use backrun::errors::{BackupError, Result};
use backrun::exec::CopyEngine;
use backrun::store::TaskStore;
use backrun::task::BackupTask;

/// Scripted outcome for one task name in [`FakeCopyEngine`].
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Ok(String),
    Fail(String),
}

/// A fake copy engine that:
/// - records which tasks were "copied", in invocation order
/// - returns the scripted outcome for the task name, or a generic
///   `done: <name>` success when no script is present.
pub struct FakeCopyEngine {
    outcomes: HashMap<String, FakeOutcome>,
    invoked: Arc<Mutex<Vec<String>>>,
}

impl FakeCopyEngine {
    pub fn new(invoked: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            outcomes: HashMap::new(),
            invoked,
        }
    }

    pub fn ok(mut self, task: &str, message: &str) -> Self {
        self.outcomes
            .insert(task.to_string(), FakeOutcome::Ok(message.to_string()));
        self
    }

    pub fn fail(mut self, task: &str, cause: &str) -> Self {
        self.outcomes
            .insert(task.to_string(), FakeOutcome::Fail(cause.to_string()));
        self
    }
}

impl CopyEngine for FakeCopyEngine {
    fn copy(
        &mut self,
        _source: String,
        _destination: String,
        task_name: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let outcome = self.outcomes.get(&task_name).cloned();
        let invoked = Arc::clone(&self.invoked);

        Box::pin(async move {
            invoked.lock().unwrap().push(task_name.clone());

            match outcome {
                Some(FakeOutcome::Ok(message)) => Ok(message),
                Some(FakeOutcome::Fail(cause)) => {
                    Err(BackupError::Other(anyhow::anyhow!(cause)))
                }
                None => Ok(format!("done: {task_name}")),
            }
        })
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<BackupTask>,
    fail_load: bool,
    fail_save: bool,
    saves: u64,
}

/// In-memory task store with scriptable failures.
///
/// Clones share the same underlying state, so a test can keep a handle while
/// the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<Mutex<StoreState>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<BackupTask>) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().tasks = tasks;
        store
    }

    pub fn fail_load(&self, fail: bool) {
        self.inner.lock().unwrap().fail_load = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.inner.lock().unwrap().fail_save = fail;
    }

    /// The currently persisted task list.
    pub fn stored(&self) -> Vec<BackupTask> {
        self.inner.lock().unwrap().tasks.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u64 {
        self.inner.lock().unwrap().saves
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Vec<BackupTask>>> + Send + '_>> {
        Box::pin(async move {
            let state = self.inner.lock().unwrap();
            if state.fail_load {
                return Err(BackupError::Store("load failure (scripted)".to_string()));
            }
            Ok(state.tasks.clone())
        })
    }

    fn save(
        &self,
        tasks: Vec<BackupTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.inner.lock().unwrap();
            if state.fail_save {
                return Err(BackupError::Store("save failure (scripted)".to_string()));
            }
            state.tasks = tasks;
            state.saves += 1;
            Ok(())
        })
    }
}
