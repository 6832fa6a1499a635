//! Domain records for task history.

use crate::run::domain::RunId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a prompt entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptEntryId(Uuid);

impl PromptEntryId {
    /// Creates a new random prompt-entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for PromptEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromptEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an AI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiSummaryId(Uuid);

impl AiSummaryId {
    /// Creates a new random summary identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AiSummaryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AiSummaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prompt exchanged while working on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Entry identifier.
    pub id: PromptEntryId,
    /// Owning task.
    pub task_id: TaskId,
    /// Run the prompt belonged to, if any.
    pub run_id: Option<RunId>,
    /// Who authored the prompt ("operator", "agent", ...).
    pub author: String,
    /// Prompt text.
    pub content: String,
    /// Capture timestamp.
    pub created_at_utc: DateTime<Utc>,
}

impl PromptEntry {
    /// Records a prompt at the current clock time.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        run_id: Option<RunId>,
        author: impl Into<String>,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: PromptEntryId::new(),
            task_id,
            run_id,
            author: author.into(),
            content: content.into(),
            created_at_utc: clock.utc(),
        }
    }
}

/// An AI-generated summary of task or run activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSummary {
    /// Summary identifier.
    pub id: AiSummaryId,
    /// Owning task.
    pub task_id: TaskId,
    /// Run the summary describes, if any.
    pub run_id: Option<RunId>,
    /// Summary text.
    pub content: String,
    /// Model that produced the summary, if reported.
    pub model: Option<String>,
    /// Capture timestamp.
    pub created_at_utc: DateTime<Utc>,
}

impl AiSummary {
    /// Records a summary at the current clock time.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        run_id: Option<RunId>,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AiSummaryId::new(),
            task_id,
            run_id,
            content: content.into(),
            model: None,
            created_at_utc: clock.utc(),
        }
    }

    /// Attaches the producing model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
