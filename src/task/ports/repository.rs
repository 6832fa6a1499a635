//! Repository port for task persistence, scheduling queries, and deletion.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task (schedule, flags, policies).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Removes a task record.
    ///
    /// Returns whether a record was actually removed, so callers can
    /// distinguish a repeated delete from a first delete.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Returns enabled tasks due for dispatch at `now`, capped at `limit`.
    ///
    /// Ordered by next-run timestamp, then creation time, for stable
    /// dispatch batches.
    async fn list_due(&self, now: DateTime<Utc>, limit: usize)
    -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks created before `cutoff`, oldest first, capped at
    /// `scan_limit`.
    ///
    /// Used by retention scans; the cap bounds scan latency rather than
    /// result correctness.
    async fn list_created_before(
        &self,
        cutoff: DateTime<Utc>,
        scan_limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
