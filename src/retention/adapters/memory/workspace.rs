//! In-memory workspace store for tests and storeless deployments.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::retention::ports::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult};
use crate::task::domain::TaskId;

/// Workspace store tracking directories as a plain id set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceStore {
    state: Arc<RwLock<HashSet<TaskId>>>,
    fail_removals: bool,
}

impl InMemoryWorkspaceStore {
    /// Creates an empty workspace store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose removals always fail, for exercising the
    /// best-effort error channel.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            state: Arc::new(RwLock::new(HashSet::new())),
            fail_removals: true,
        }
    }

    /// Registers a workspace directory for a task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError`] when the backing lock is poisoned.
    pub fn create_workspace(&self, task_id: TaskId) -> WorkspaceStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        state.insert(task_id);
        Ok(())
    }

    /// Returns whether a workspace exists for the task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError`] when the backing lock is poisoned.
    pub fn has_workspace(&self, task_id: TaskId) -> WorkspaceStoreResult<bool> {
        let state = self
            .state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Ok(state.contains(&task_id))
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn remove_workspace(&self, task_id: TaskId) -> WorkspaceStoreResult<bool> {
        if self.fail_removals {
            return Err(std::io::Error::other("injected workspace failure").into());
        }
        let mut state = self
            .state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Ok(state.remove(&task_id))
    }
}
