//! Port for on-disk task workspace cleanup.
//!
//! Workspace removal is best-effort: the engine counts failures instead
//! of propagating them, because the database is the source of truth and
//! a stray directory is recoverable garbage, not corruption.

use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace store operations.
pub type WorkspaceStoreResult<T> = Result<T, WorkspaceStoreError>;

/// Task workspace directory contract.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Removes the workspace directory of a task.
    ///
    /// Returns whether a directory was actually removed; an absent
    /// directory is a clean `false`, not an error.
    async fn remove_workspace(&self, task_id: TaskId) -> WorkspaceStoreResult<bool>;
}

/// Errors returned by workspace store implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceStoreError {
    /// Filesystem-level failure.
    #[error("workspace error: {0}")]
    Filesystem(Arc<std::io::Error>),
}

impl From<std::io::Error> for WorkspaceStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Filesystem(Arc::new(err))
    }
}
