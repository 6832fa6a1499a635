//! Thread-safe in-memory semantic chunk repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::run::domain::RunId;
use crate::search::{
    domain::SemanticChunk,
    ports::{
        SemanticChunkRepository, SemanticChunkRepositoryError, SemanticChunkRepositoryResult,
    },
};
use crate::task::domain::TaskId;

/// In-memory document-collection adapter for semantic chunks, keyed by
/// `(task_id, chunk_key)`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySemanticChunkRepository {
    state: Arc<RwLock<HashMap<(TaskId, String), SemanticChunk>>>,
}

impl InMemorySemanticChunkRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> SemanticChunkRepositoryError {
    SemanticChunkRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SemanticChunkRepository for InMemorySemanticChunkRepository {
    async fn merge(&self, chunk: &SemanticChunk) -> SemanticChunkRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.insert(
            (chunk.task_id(), chunk.chunk_key().to_owned()),
            chunk.clone(),
        );
        Ok(())
    }

    async fn list_by_task(
        &self,
        task_id: TaskId,
    ) -> SemanticChunkRepositoryResult<Vec<SemanticChunk>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut chunks: Vec<SemanticChunk> = state
            .values()
            .filter(|chunk| chunk.task_id() == task_id)
            .cloned()
            .collect();
        chunks.sort_by(|a, b| a.chunk_key().cmp(b.chunk_key()));
        Ok(chunks)
    }

    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> SemanticChunkRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|(owner, _), chunk| {
            *owner != task_id
                && !chunk.run_id().is_some_and(|run_id| run_ids.contains(&run_id))
        });
        Ok(before.saturating_sub(state.len()))
    }
}
