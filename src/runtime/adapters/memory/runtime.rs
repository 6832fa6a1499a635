//! Thread-safe in-memory runtime repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::runtime::{
    domain::{RuntimeId, TaskRuntime},
    ports::{RuntimeRepository, RuntimeRepositoryError, RuntimeRepositoryResult},
};

/// In-memory document-collection adapter for runtimes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuntimeRepository {
    state: Arc<RwLock<HashMap<RuntimeId, TaskRuntime>>>,
}

impl InMemoryRuntimeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> RuntimeRepositoryError {
    RuntimeRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RuntimeRepository for InMemoryRuntimeRepository {
    async fn upsert(&self, runtime: &TaskRuntime) -> RuntimeRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.insert(runtime.runtime_id().clone(), runtime.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RuntimeId) -> RuntimeRepositoryResult<Option<TaskRuntime>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(id).cloned())
    }

    async fn list_all(&self) -> RuntimeRepositoryResult<Vec<TaskRuntime>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut runtimes: Vec<TaskRuntime> = state.values().cloned().collect();
        runtimes.sort_by(|a, b| a.runtime_id().cmp(b.runtime_id()));
        Ok(runtimes)
    }
}
