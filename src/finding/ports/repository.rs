//! Repository port for finding persistence and open-finding queries.

use crate::finding::domain::{Finding, FindingId};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for finding repository operations.
pub type FindingRepositoryResult<T> = Result<T, FindingRepositoryError>;

/// Finding persistence contract.
#[async_trait]
pub trait FindingRepository: Send + Sync {
    /// Stores a new finding.
    ///
    /// # Errors
    ///
    /// Returns [`FindingRepositoryError::DuplicateFinding`] when the
    /// finding ID already exists.
    async fn store(&self, finding: &Finding) -> FindingRepositoryResult<()>;

    /// Persists changes to an existing finding.
    ///
    /// # Errors
    ///
    /// Returns [`FindingRepositoryError::NotFound`] when the finding does
    /// not exist.
    async fn update(&self, finding: &Finding) -> FindingRepositoryResult<()>;

    /// Finds a finding by identifier.
    async fn find_by_id(&self, id: FindingId) -> FindingRepositoryResult<Option<Finding>>;

    /// Returns all findings for a task.
    async fn list_by_task(&self, task_id: TaskId) -> FindingRepositoryResult<Vec<Finding>>;

    /// Returns whether the task has any finding in an open state.
    async fn has_open_for_task(&self, task_id: TaskId) -> FindingRepositoryResult<bool>;

    /// Removes findings attached to any of the given runs, returning the
    /// removed count.
    async fn delete_by_runs(&self, run_ids: &[RunId]) -> FindingRepositoryResult<usize>;
}

/// Errors returned by finding repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FindingRepositoryError {
    /// A finding with the same identifier already exists.
    #[error("duplicate finding identifier: {0}")]
    DuplicateFinding(FindingId),

    /// The finding was not found.
    #[error("finding not found: {0}")]
    NotFound(FindingId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FindingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
