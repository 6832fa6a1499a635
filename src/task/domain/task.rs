//! Task aggregate root and related scheduling types.

use super::{
    ParseTaskKindError, ProjectId, RepositoryId, TaskDomainError, TaskId, TaskName,
    compute_next_run, cron_expression_is_valid, next_occurrence,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Dispatch kind of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Runs once when consumed by a dispatcher, then disables itself.
    OneShot,
    /// Runs on a cron schedule evaluated in UTC.
    Cron,
    /// Dispatched externally by an event; never carries a next-run time.
    EventDriven,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneShot => "one_shot",
            Self::Cron => "cron",
            Self::EventDriven => "event_driven",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "one_shot" => Ok(Self::OneShot),
            "cron" => Ok(Self::Cron),
            "event_driven" => Ok(Self::EventDriven),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Opaque policy payloads copied through to run dispatch.
///
/// The control plane never interprets these beyond persistence; runners
/// consume them at execution time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPolicies {
    /// Retry policy payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<Value>,
    /// Timeout policy payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Value>,
    /// Sandbox policy payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<Value>,
    /// Artifact retention policy payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Value>,
    /// Approval gating policy payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<Value>,
}

/// Parameter object for creating a new task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDefinition {
    /// Owning repository.
    pub repository_id: RepositoryId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name, validated non-empty.
    pub name: String,
    /// Dispatch kind.
    pub kind: TaskKind,
    /// Whether the task participates in scheduling.
    pub enabled: bool,
    /// Cron schedule expression, required for [`TaskKind::Cron`].
    pub cron_expression: Option<String>,
    /// Maximum concurrent runs, at least 1.
    pub concurrency_limit: u32,
    /// Opaque policy payloads.
    pub policies: TaskPolicies,
}

/// Field-wise update applied to an existing task.
///
/// Absent fields leave the stored value unchanged; the cron expression
/// uses a nested option so an update can explicitly clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    name: Option<String>,
    enabled: Option<bool>,
    cron_expression: Option<Option<String>>,
    concurrency_limit: Option<u32>,
    policies: Option<TaskPolicies>,
}

impl TaskUpdate {
    /// Creates an empty update that touches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets a new cron expression.
    #[must_use]
    pub fn with_cron_expression(mut self, expression: impl Into<String>) -> Self {
        self.cron_expression = Some(Some(expression.into()));
        self
    }

    /// Clears the stored cron expression.
    #[must_use]
    pub fn clearing_cron_expression(mut self) -> Self {
        self.cron_expression = Some(None);
        self
    }

    /// Sets a new concurrency limit.
    #[must_use]
    pub const fn with_concurrency_limit(mut self, limit: u32) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    /// Replaces the policy payloads.
    #[must_use]
    pub fn with_policies(mut self, policies: TaskPolicies) -> Self {
        self.policies = Some(policies);
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    repository_id: RepositoryId,
    project_id: ProjectId,
    name: TaskName,
    kind: TaskKind,
    enabled: bool,
    cron_expression: Option<String>,
    next_run_at_utc: Option<DateTime<Utc>>,
    concurrency_limit: u32,
    policies: TaskPolicies,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted repository reference.
    pub repository_id: RepositoryId,
    /// Persisted project reference.
    pub project_id: ProjectId,
    /// Persisted display name.
    pub name: TaskName,
    /// Persisted dispatch kind.
    pub kind: TaskKind,
    /// Persisted enabled flag.
    pub enabled: bool,
    /// Persisted cron expression, if any.
    pub cron_expression: Option<String>,
    /// Persisted next-run timestamp, if any.
    pub next_run_at_utc: Option<DateTime<Utc>>,
    /// Persisted concurrency limit.
    pub concurrency_limit: u32,
    /// Persisted policy payloads.
    pub policies: TaskPolicies,
    /// Persisted creation timestamp.
    pub created_at_utc: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at_utc: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from a validated definition.
    ///
    /// `next_run_at_utc` is computed immediately from the definition and
    /// the supplied clock.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the name is empty, the concurrency
    /// limit is zero, a cron task is missing or carries an unparseable
    /// expression, or a non-cron task carries one.
    pub fn create(definition: TaskDefinition, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let name = TaskName::new(definition.name)?;
        if definition.concurrency_limit == 0 {
            return Err(TaskDomainError::InvalidConcurrencyLimit);
        }
        validate_schedule(definition.kind, definition.cron_expression.as_deref())?;

        let timestamp = clock.utc();
        let next_run_at_utc = compute_next_run(
            definition.kind,
            definition.enabled,
            definition.cron_expression.as_deref(),
            timestamp,
        );

        Ok(Self {
            id: TaskId::new(),
            repository_id: definition.repository_id,
            project_id: definition.project_id,
            name,
            kind: definition.kind,
            enabled: definition.enabled,
            cron_expression: definition.cron_expression,
            next_run_at_utc,
            concurrency_limit: definition.concurrency_limit,
            policies: definition.policies,
            created_at_utc: timestamp,
            updated_at_utc: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            repository_id: data.repository_id,
            project_id: data.project_id,
            name: data.name,
            kind: data.kind,
            enabled: data.enabled,
            cron_expression: data.cron_expression,
            next_run_at_utc: data.next_run_at_utc,
            concurrency_limit: data.concurrency_limit,
            policies: data.policies,
            created_at_utc: data.created_at_utc,
            updated_at_utc: data.updated_at_utc,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning repository identifier.
    #[must_use]
    pub const fn repository_id(&self) -> RepositoryId {
        self.repository_id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the dispatch kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns whether the task participates in scheduling.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cron expression, if any.
    #[must_use]
    pub fn cron_expression(&self) -> Option<&str> {
        self.cron_expression.as_deref()
    }

    /// Returns the computed next-run timestamp, if any.
    #[must_use]
    pub const fn next_run_at_utc(&self) -> Option<DateTime<Utc>> {
        self.next_run_at_utc
    }

    /// Returns the concurrency limit.
    #[must_use]
    pub const fn concurrency_limit(&self) -> u32 {
        self.concurrency_limit
    }

    /// Returns the opaque policy payloads.
    #[must_use]
    pub const fn policies(&self) -> &TaskPolicies {
        &self.policies
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at_utc
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at_utc(&self) -> DateTime<Utc> {
        self.updated_at_utc
    }

    /// Returns whether the task is due for dispatch at `now`.
    ///
    /// One-shot tasks are due whenever enabled; cron tasks are due when
    /// their next-run timestamp has been reached; event-driven tasks are
    /// never due through the scheduler.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        match self.kind {
            TaskKind::OneShot => true,
            TaskKind::Cron => self
                .next_run_at_utc
                .is_some_and(|next_run| next_run <= now),
            TaskKind::EventDriven => false,
        }
    }

    /// Applies a field-wise update, then recomputes `next_run_at_utc`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the merged result fails the same
    /// validation as [`Task::create`]. The task is left unchanged on error.
    pub fn apply_update(
        &mut self,
        update: TaskUpdate,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let name = match update.name {
            Some(raw) => Some(TaskName::new(raw)?),
            None => None,
        };
        let merged_expression = update
            .cron_expression
            .clone()
            .unwrap_or_else(|| self.cron_expression.clone());
        let merged_enabled = update.enabled.unwrap_or(self.enabled);
        if update.concurrency_limit == Some(0) {
            return Err(TaskDomainError::InvalidConcurrencyLimit);
        }
        validate_schedule(self.kind, merged_expression.as_deref())?;

        if let Some(validated) = name {
            self.name = validated;
        }
        self.enabled = merged_enabled;
        self.cron_expression = merged_expression;
        if let Some(limit) = update.concurrency_limit {
            self.concurrency_limit = limit;
        }
        if let Some(policies) = update.policies {
            self.policies = policies;
        }
        self.recompute_next_run(clock);
        Ok(())
    }

    /// Recomputes `next_run_at_utc` from the current task shape.
    pub fn recompute_next_run(&mut self, clock: &impl Clock) {
        let now = clock.utc();
        self.next_run_at_utc =
            compute_next_run(self.kind, self.enabled, self.cron_expression.as_deref(), now);
        self.updated_at_utc = now;
    }

    /// Consumes the task for dispatch.
    ///
    /// One-shot tasks disable themselves and drop their next-run timestamp;
    /// cron tasks advance to the following occurrence; event-driven tasks
    /// are unaffected. Consuming twice is harmless.
    pub fn consume(&mut self, clock: &impl Clock) {
        let now = clock.utc();
        match self.kind {
            TaskKind::OneShot => {
                self.enabled = false;
                self.next_run_at_utc = None;
            }
            TaskKind::Cron => {
                self.next_run_at_utc = self
                    .cron_expression
                    .as_deref()
                    .and_then(|expression| next_occurrence(expression, now));
            }
            TaskKind::EventDriven => {}
        }
        self.updated_at_utc = now;
    }
}

/// Validates kind/expression coherence for create and update paths.
fn validate_schedule(kind: TaskKind, expression: Option<&str>) -> Result<(), TaskDomainError> {
    match kind {
        TaskKind::Cron => {
            let raw = expression
                .filter(|value| !value.trim().is_empty())
                .ok_or(TaskDomainError::MissingCronExpression)?;
            if !cron_expression_is_valid(raw) {
                return Err(TaskDomainError::InvalidCronExpression(raw.to_owned()));
            }
            Ok(())
        }
        TaskKind::OneShot | TaskKind::EventDriven => {
            if expression.is_some_and(|value| !value.trim().is_empty()) {
                return Err(TaskDomainError::UnexpectedCronExpression(kind));
            }
            Ok(())
        }
    }
}
