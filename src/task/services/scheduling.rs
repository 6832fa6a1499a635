//! Service layer for task creation, update, and due-task resolution.

use crate::task::{
    domain::{
        ProjectId, RepositoryId, Task, TaskDefinition, TaskDomainError, TaskId, TaskKind,
        TaskPolicies, TaskUpdate,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    repository_id: RepositoryId,
    project_id: ProjectId,
    name: String,
    kind: TaskKind,
    enabled: bool,
    cron_expression: Option<String>,
    concurrency_limit: u32,
    policies: TaskPolicies,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    ///
    /// Tasks start enabled with a concurrency limit of 1.
    #[must_use]
    pub fn new(
        repository_id: RepositoryId,
        project_id: ProjectId,
        name: impl Into<String>,
        kind: TaskKind,
    ) -> Self {
        Self {
            repository_id,
            project_id,
            name: name.into(),
            kind,
            enabled: true,
            cron_expression: None,
            concurrency_limit: 1,
            policies: TaskPolicies::default(),
        }
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the cron schedule expression.
    #[must_use]
    pub fn with_cron_expression(mut self, expression: impl Into<String>) -> Self {
        self.cron_expression = Some(expression.into());
        self
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub const fn with_concurrency_limit(mut self, limit: u32) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Sets the opaque policy payloads.
    #[must_use]
    pub fn with_policies(mut self, policies: TaskPolicies) -> Self {
        self.policies = policies;
        self
    }
}

/// Service-level errors for task scheduling operations.
#[derive(Debug, Error)]
pub enum TaskSchedulingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task scheduling service operations.
pub type TaskSchedulingResult<T> = Result<T, TaskSchedulingError>;

/// Task definition and due-task resolution service.
#[derive(Clone)]
pub struct TaskSchedulingService<C>
where
    C: Clock + Send + Sync,
{
    repository: Arc<dyn TaskRepository>,
    clock: Arc<C>,
}

impl<C> TaskSchedulingService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new task scheduling service.
    #[must_use]
    pub const fn new(repository: Arc<dyn TaskRepository>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and persists a new task.
    ///
    /// Validation failures are raised before any write reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError`] when input validation fails or the
    /// repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskSchedulingResult<Task> {
        let CreateTaskRequest {
            repository_id,
            project_id,
            name,
            kind,
            enabled,
            cron_expression,
            concurrency_limit,
            policies,
        } = request;

        let task = Task::create(
            TaskDefinition {
                repository_id,
                project_id,
                name,
                kind,
                enabled,
                cron_expression,
                concurrency_limit,
                policies,
            },
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        debug!(task_id = %task.id(), kind = %task.kind(), "task created");
        Ok(task)
    }

    /// Applies a field-wise update and recomputes the next-run timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Domain`] when the merged task fails
    /// validation, or [`TaskSchedulingError::Repository`] when the task is
    /// missing or persistence fails.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> TaskSchedulingResult<Task> {
        let mut task = self.find_by_id_or_error(task_id).await?;
        task.apply_update(update, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// Returns `Ok(None)` when no task has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskSchedulingResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns enabled tasks due for dispatch at `now`, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Repository`] when the due-task query
    /// fails.
    pub async fn list_due_tasks(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> TaskSchedulingResult<Vec<Task>> {
        Ok(self.repository.list_due(now, limit).await?)
    }

    /// Consumes a task for dispatch, advancing or clearing its schedule.
    ///
    /// Returns `Ok(None)` when the task has disappeared under a concurrent
    /// delete; consuming an already-consumed one-shot is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Repository`] when persistence fails.
    pub async fn consume_task(&self, task_id: TaskId) -> TaskSchedulingResult<Option<Task>> {
        let Some(mut task) = self.repository.find_by_id(task_id).await? else {
            return Ok(None);
        };
        task.consume(&*self.clock);
        match self.repository.update(&task).await {
            Ok(()) => {
                debug!(task_id = %task.id(), "task consumed");
                Ok(Some(task))
            }
            Err(TaskRepositoryError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id_or_error(&self, task_id: TaskId) -> TaskSchedulingResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(task_id).into())
    }
}
