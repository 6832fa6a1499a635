//! Thread-safe in-memory task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// In-memory document-collection adapter for tasks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        Ok(state.remove(&id).is_some())
    }

    async fn list_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut due: Vec<Task> = state
            .values()
            .filter(|task| task.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|task| (task.next_run_at_utc(), task.created_at_utc(), task.id()));
        due.truncate(limit);
        Ok(due)
    }

    async fn list_created_before(
        &self,
        cutoff: DateTime<Utc>,
        scan_limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut aged: Vec<Task> = state
            .values()
            .filter(|task| task.created_at_utc() < cutoff)
            .cloned()
            .collect();
        aged.sort_by_key(|task| (task.created_at_utc(), task.id()));
        aged.truncate(scan_limit);
        Ok(aged)
    }
}
