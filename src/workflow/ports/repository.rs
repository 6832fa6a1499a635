//! Repository port for workflow stages.

use crate::task::domain::TaskId;
use crate::workflow::domain::WorkflowStage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow stage repository operations.
pub type WorkflowStageRepositoryResult<T> = Result<T, WorkflowStageRepositoryError>;

/// Workflow stage persistence contract.
#[async_trait]
pub trait WorkflowStageRepository: Send + Sync {
    /// Stores a stage.
    async fn store(&self, stage: &WorkflowStage) -> WorkflowStageRepositoryResult<()>;

    /// Returns whether any stage references the task.
    async fn references_task(&self, task_id: TaskId) -> WorkflowStageRepositoryResult<bool>;

    /// Returns all stages of a named workflow ordered by position.
    async fn list_by_workflow(
        &self,
        workflow_name: &str,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStage>>;
}

/// Errors returned by workflow stage repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowStageRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowStageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
