//! Thread-safe in-memory tool projection repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::event::{
    domain::{ToolProjection, ToolProjectionId},
    ports::{EventRepositoryError, EventRepositoryResult, ToolProjectionRepository},
};
use crate::run::domain::RunId;

/// In-memory document-collection adapter for tool projections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolProjectionRepository {
    state: Arc<RwLock<HashMap<ToolProjectionId, ToolProjection>>>,
}

impl InMemoryToolProjectionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> EventRepositoryError {
    EventRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ToolProjectionRepository for InMemoryToolProjectionRepository {
    async fn upsert(&self, projection: &ToolProjection) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.insert(projection.id(), projection.clone());
        Ok(())
    }

    async fn list_by_run(&self, run_id: RunId) -> EventRepositoryResult<Vec<ToolProjection>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut projections: Vec<ToolProjection> = state
            .values()
            .filter(|projection| projection.run_id() == run_id)
            .cloned()
            .collect();
        projections.sort_by_key(|projection| {
            (projection.sequence_start(), projection.sequence_end())
        });
        Ok(projections)
    }

    async fn delete_by_runs(&self, run_ids: &[RunId]) -> EventRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|_, projection| !run_ids.contains(&projection.run_id()));
        Ok(before.saturating_sub(state.len()))
    }
}
