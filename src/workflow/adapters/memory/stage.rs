//! Thread-safe in-memory workflow stage repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::domain::TaskId;
use crate::workflow::{
    domain::WorkflowStage,
    ports::{
        WorkflowStageRepository, WorkflowStageRepositoryError, WorkflowStageRepositoryResult,
    },
};

/// In-memory document-collection adapter for workflow stages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStageRepository {
    state: Arc<RwLock<Vec<WorkflowStage>>>,
}

impl InMemoryWorkflowStageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> WorkflowStageRepositoryError {
    WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkflowStageRepository for InMemoryWorkflowStageRepository {
    async fn store(&self, stage: &WorkflowStage) -> WorkflowStageRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.push(stage.clone());
        Ok(())
    }

    async fn references_task(&self, task_id: TaskId) -> WorkflowStageRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.iter().any(|stage| stage.task_id == task_id))
    }

    async fn list_by_workflow(
        &self,
        workflow_name: &str,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStage>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut stages: Vec<WorkflowStage> = state
            .iter()
            .filter(|stage| stage.workflow_name == workflow_name)
            .cloned()
            .collect();
        stages.sort_by_key(|stage| stage.position);
        Ok(stages)
    }
}
