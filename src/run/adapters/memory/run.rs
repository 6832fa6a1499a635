//! Thread-safe in-memory run repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::run::{
    domain::{Run, RunId},
    ports::{RunRepository, RunRepositoryError, RunRepositoryResult},
};
use crate::task::domain::TaskId;

/// In-memory document-collection adapter for runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRunRepository {
    state: Arc<RwLock<HashMap<RunId, Run>>>,
}

impl InMemoryRunRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> RunRepositoryError {
    RunRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn store(&self, run: &Run) -> RunRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&run.id()) {
            return Err(RunRepositoryError::DuplicateRun(run.id()));
        }
        state.insert(run.id(), run.clone());
        Ok(())
    }

    async fn update(&self, run: &Run) -> RunRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&run.id()) {
            return Err(RunRepositoryError::NotFound(run.id()));
        }
        state.insert(run.id(), run.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<Run>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_by_task(&self, task_id: TaskId) -> RunRepositoryResult<Vec<Run>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut runs: Vec<Run> = state
            .values()
            .filter(|run| run.task_id() == task_id)
            .cloned()
            .collect();
        runs.sort_by_key(|run| (run.created_at_utc(), run.id()));
        Ok(runs)
    }

    async fn list_created_since(&self, since: DateTime<Utc>) -> RunRepositoryResult<Vec<Run>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut runs: Vec<Run> = state
            .values()
            .filter(|run| run.created_at_utc() >= since)
            .cloned()
            .collect();
        runs.sort_by_key(|run| (run.created_at_utc(), run.id()));
        Ok(runs)
    }

    async fn list_terminal_ended_before(
        &self,
        cutoff: DateTime<Utc>,
        scan_limit: usize,
    ) -> RunRepositoryResult<Vec<Run>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut runs: Vec<Run> = state
            .values()
            .filter(|run| {
                run.state().is_terminal()
                    && run.ended_at_utc().is_some_and(|ended| ended < cutoff)
            })
            .cloned()
            .collect();
        runs.sort_by_key(|run| (run.ended_at_utc(), run.id()));
        runs.truncate(scan_limit);
        Ok(runs)
    }

    async fn delete_by_task(&self, task_id: TaskId) -> RunRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|_, run| run.task_id() != task_id);
        Ok(before.saturating_sub(state.len()))
    }
}
