//! Repository port for semantic chunks.

use crate::run::domain::RunId;
use crate::search::domain::SemanticChunk;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for semantic chunk repository operations.
pub type SemanticChunkRepositoryResult<T> = Result<T, SemanticChunkRepositoryError>;

/// Semantic chunk persistence contract.
///
/// Chunks are keyed by `(task_id, chunk_key)`: merging an existing key
/// updates the stored record in place.
#[async_trait]
pub trait SemanticChunkRepository: Send + Sync {
    /// Inserts or replaces the chunk at its key.
    async fn merge(&self, chunk: &SemanticChunk) -> SemanticChunkRepositoryResult<()>;

    /// Returns all chunks of a task.
    async fn list_by_task(&self, task_id: TaskId)
    -> SemanticChunkRepositoryResult<Vec<SemanticChunk>>;

    /// Removes chunks attached to the task or any of the given runs,
    /// returning the removed count.
    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> SemanticChunkRepositoryResult<usize>;
}

/// Errors returned by semantic chunk repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SemanticChunkRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SemanticChunkRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
