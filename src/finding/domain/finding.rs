//! Finding aggregate and workflow states.

use super::{FindingDomainError, FindingId, ParseFindingStateError};
use crate::run::domain::RunId;
use crate::task::domain::{RepositoryId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow state of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingState {
    /// Freshly raised, not yet looked at.
    New,
    /// Seen by an operator.
    Acknowledged,
    /// Actively being worked on.
    InProgress,
    /// Fixed or otherwise addressed.
    Resolved,
    /// Dismissed without action.
    Ignored,
}

impl FindingState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Acknowledged => "acknowledged",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Ignored => "ignored",
        }
    }

    /// Returns whether the finding still demands attention.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::Acknowledged | Self::InProgress)
    }
}

impl fmt::Display for FindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FindingState {
    type Error = ParseFindingStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "acknowledged" => Ok(Self::Acknowledged),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "ignored" => Ok(Self::Ignored),
            _ => Err(ParseFindingStateError(value.to_owned())),
        }
    }
}

/// Severity attached to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    /// Informational only.
    Info,
    /// Worth a look, not urgent.
    Low,
    /// Should be scheduled.
    Medium,
    /// Needs prompt attention.
    High,
    /// Blocks the task outright.
    Critical,
}

impl FindingSeverity {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    id: FindingId,
    run_id: RunId,
    task_id: TaskId,
    repository_id: RepositoryId,
    title: String,
    severity: FindingSeverity,
    state: FindingState,
    assignee: Option<String>,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted finding.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedFindingData {
    /// Persisted finding identifier.
    pub id: FindingId,
    /// Persisted run reference.
    pub run_id: RunId,
    /// Persisted task reference.
    pub task_id: TaskId,
    /// Persisted repository reference.
    pub repository_id: RepositoryId,
    /// Persisted title.
    pub title: String,
    /// Persisted severity.
    pub severity: FindingSeverity,
    /// Persisted workflow state.
    pub state: FindingState,
    /// Persisted assignee, if any.
    pub assignee: Option<String>,
    /// Persisted creation timestamp.
    pub created_at_utc: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at_utc: DateTime<Utc>,
}

impl Finding {
    /// Raises a new finding from a failed run.
    ///
    /// # Errors
    ///
    /// Returns [`FindingDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn raise(
        run_id: RunId,
        task_id: TaskId,
        repository_id: RepositoryId,
        title: impl Into<String>,
        severity: FindingSeverity,
        clock: &impl Clock,
    ) -> Result<Self, FindingDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FindingDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: FindingId::new(),
            run_id,
            task_id,
            repository_id,
            title: trimmed.to_owned(),
            severity,
            state: FindingState::New,
            assignee: None,
            created_at_utc: timestamp,
            updated_at_utc: timestamp,
        })
    }

    /// Reconstructs a finding from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFindingData) -> Self {
        Self {
            id: data.id,
            run_id: data.run_id,
            task_id: data.task_id,
            repository_id: data.repository_id,
            title: data.title,
            severity: data.severity,
            state: data.state,
            assignee: data.assignee,
            created_at_utc: data.created_at_utc,
            updated_at_utc: data.updated_at_utc,
        }
    }

    /// Returns the finding identifier.
    #[must_use]
    pub const fn id(&self) -> FindingId {
        self.id
    }

    /// Returns the originating run.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning repository.
    #[must_use]
    pub const fn repository_id(&self) -> RepositoryId {
        self.repository_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> FindingSeverity {
        self.severity
    }

    /// Returns the workflow state.
    #[must_use]
    pub const fn state(&self) -> FindingState {
        self.state
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
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

    /// Moves the finding to a new workflow state.
    ///
    /// Closed findings (`Resolved`/`Ignored`) stay closed; every other
    /// movement is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`FindingDomainError::InvalidStateChange`] when the finding
    /// is already closed.
    pub fn change_state(
        &mut self,
        to: FindingState,
        clock: &impl Clock,
    ) -> Result<(), FindingDomainError> {
        if !self.state.is_open() {
            return Err(FindingDomainError::InvalidStateChange {
                finding_id: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        self.updated_at_utc = clock.utc();
        Ok(())
    }

    /// Assigns the finding to an operator, or clears the assignment.
    pub fn assign(&mut self, assignee: Option<String>, clock: &impl Clock) {
        self.assignee = assignee.filter(|value| !value.trim().is_empty());
        self.updated_at_utc = clock.utc();
    }
}
