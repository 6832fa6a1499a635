//! Service layer for finding triage: state changes and assignment.

use crate::finding::{
    domain::{Finding, FindingDomainError, FindingId, FindingState},
    ports::{FindingRepository, FindingRepositoryError},
};
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for finding triage operations.
#[derive(Debug, Error)]
pub enum FindingTriageError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] FindingDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FindingRepositoryError),
}

/// Result type for finding triage service operations.
pub type FindingTriageResult<T> = Result<T, FindingTriageError>;

/// Finding triage orchestration service.
#[derive(Clone)]
pub struct FindingTriageService<C>
where
    C: Clock + Send + Sync,
{
    repository: Arc<dyn FindingRepository>,
    clock: Arc<C>,
}

impl<C> FindingTriageService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new finding triage service.
    #[must_use]
    pub const fn new(repository: Arc<dyn FindingRepository>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Moves a finding to a new workflow state.
    ///
    /// # Errors
    ///
    /// Returns [`FindingTriageError::Domain`] when the finding is already
    /// closed, or [`FindingTriageError::Repository`] when the finding is
    /// missing or persistence fails.
    pub async fn change_state(
        &self,
        finding_id: FindingId,
        to: FindingState,
    ) -> FindingTriageResult<Finding> {
        let mut finding = self.find_by_id_or_error(finding_id).await?;
        finding.change_state(to, &*self.clock)?;
        self.repository.update(&finding).await?;
        Ok(finding)
    }

    /// Assigns a finding to an operator, or clears the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`FindingTriageError::Repository`] when the finding is
    /// missing or persistence fails.
    pub async fn assign(
        &self,
        finding_id: FindingId,
        assignee: Option<String>,
    ) -> FindingTriageResult<Finding> {
        let mut finding = self.find_by_id_or_error(finding_id).await?;
        finding.assign(assignee, &*self.clock);
        self.repository.update(&finding).await?;
        Ok(finding)
    }

    /// Returns all findings for a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`FindingTriageError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_for_task(&self, task_id: TaskId) -> FindingTriageResult<Vec<Finding>> {
        Ok(self.repository.list_by_task(task_id).await?)
    }

    async fn find_by_id_or_error(&self, finding_id: FindingId) -> FindingTriageResult<Finding> {
        self.repository
            .find_by_id(finding_id)
            .await?
            .ok_or_else(|| FindingRepositoryError::NotFound(finding_id).into())
    }
}
