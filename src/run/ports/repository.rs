//! Repository ports for runs, run logs, and diff snapshots.
//!
//! The three ports share one error type: they cover sibling collections
//! that live and die with the run records they describe.

use crate::run::domain::{DiffSnapshot, Run, RunId, RunLogEntry};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for run repository operations.
pub type RunRepositoryResult<T> = Result<T, RunRepositoryError>;

/// Run persistence contract.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Stores a new run.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::DuplicateRun`] when the run ID already
    /// exists.
    async fn store(&self, run: &Run) -> RunRepositoryResult<()>;

    /// Persists changes to an existing run.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::NotFound`] when the run does not
    /// exist.
    async fn update(&self, run: &Run) -> RunRepositoryResult<()>;

    /// Finds a run by identifier.
    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<Run>>;

    /// Returns all runs of a task, oldest first.
    async fn list_by_task(&self, task_id: TaskId) -> RunRepositoryResult<Vec<Run>>;

    /// Returns runs created at or after `since`, for metrics windows.
    async fn list_created_since(&self, since: DateTime<Utc>) -> RunRepositoryResult<Vec<Run>>;

    /// Returns terminal runs that ended before `cutoff`, oldest ended
    /// first, capped at `scan_limit`.
    ///
    /// Used by retention pruning; the cap bounds scan latency.
    async fn list_terminal_ended_before(
        &self,
        cutoff: DateTime<Utc>,
        scan_limit: usize,
    ) -> RunRepositoryResult<Vec<Run>>;

    /// Removes every run of a task, returning the removed count.
    async fn delete_by_task(&self, task_id: TaskId) -> RunRepositoryResult<usize>;
}

/// Run log persistence contract.
#[async_trait]
pub trait RunLogRepository: Send + Sync {
    /// Appends a captured log entry.
    async fn append(&self, entry: &RunLogEntry) -> RunRepositoryResult<()>;

    /// Returns all log entries for a run, oldest first.
    async fn list_by_run(&self, run_id: RunId) -> RunRepositoryResult<Vec<RunLogEntry>>;

    /// Returns the newest log timestamp across the given runs.
    async fn latest_timestamp_for_runs(
        &self,
        run_ids: &[RunId],
    ) -> RunRepositoryResult<Option<DateTime<Utc>>>;

    /// Removes log entries for any of the given runs, returning the
    /// removed count.
    async fn delete_by_runs(&self, run_ids: &[RunId]) -> RunRepositoryResult<usize>;
}

/// Diff snapshot persistence contract.
#[async_trait]
pub trait DiffSnapshotRepository: Send + Sync {
    /// Appends a captured diff snapshot.
    async fn append(&self, snapshot: &DiffSnapshot) -> RunRepositoryResult<()>;

    /// Returns all diff snapshots for a run, oldest first.
    async fn list_by_run(&self, run_id: RunId) -> RunRepositoryResult<Vec<DiffSnapshot>>;

    /// Removes snapshots for any of the given runs, returning the removed
    /// count.
    async fn delete_by_runs(&self, run_ids: &[RunId]) -> RunRepositoryResult<usize>;
}

/// Errors returned by run-collection repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RunRepositoryError {
    /// A run with the same identifier already exists.
    #[error("duplicate run identifier: {0}")]
    DuplicateRun(RunId),

    /// The run was not found.
    #[error("run not found: {0}")]
    NotFound(RunId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RunRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
