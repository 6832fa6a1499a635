//! Repository ports for prompt entries and AI summaries.

use crate::history::domain::{AiSummary, PromptEntry};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for history repository operations.
pub type HistoryRepositoryResult<T> = Result<T, HistoryRepositoryError>;

/// Prompt entry persistence contract.
#[async_trait]
pub trait PromptEntryRepository: Send + Sync {
    /// Appends a recorded prompt.
    async fn append(&self, entry: &PromptEntry) -> HistoryRepositoryResult<()>;

    /// Returns all prompts of a task, oldest first.
    async fn list_by_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<PromptEntry>>;

    /// Returns the newest prompt timestamp for a task.
    async fn latest_timestamp_for_task(
        &self,
        task_id: TaskId,
    ) -> HistoryRepositoryResult<Option<DateTime<Utc>>>;

    /// Removes prompts attached to the task or any of the given runs,
    /// returning the removed count.
    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> HistoryRepositoryResult<usize>;
}

/// AI summary persistence contract.
#[async_trait]
pub trait AiSummaryRepository: Send + Sync {
    /// Appends a recorded summary.
    async fn append(&self, summary: &AiSummary) -> HistoryRepositoryResult<()>;

    /// Returns all summaries of a task, oldest first.
    async fn list_by_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<AiSummary>>;

    /// Returns the newest summary timestamp for a task.
    async fn latest_timestamp_for_task(
        &self,
        task_id: TaskId,
    ) -> HistoryRepositoryResult<Option<DateTime<Utc>>>;

    /// Removes summaries attached to the task or any of the given runs,
    /// returning the removed count.
    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> HistoryRepositoryResult<usize>;
}

/// Errors returned by history repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HistoryRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HistoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
