//! Domain records for workflow stages.

use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowStageId(Uuid);

impl WorkflowStageId {
    /// Creates a new random stage identifier.
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

impl Default for WorkflowStageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkflowStageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stage of a named workflow, pointing at the task it dispatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStage {
    /// Stage identifier.
    pub id: WorkflowStageId,
    /// Workflow the stage belongs to.
    pub workflow_name: String,
    /// Position within the workflow, zero-based.
    pub position: u32,
    /// Task the stage dispatches.
    pub task_id: TaskId,
    /// Creation timestamp.
    pub created_at_utc: DateTime<Utc>,
}

impl WorkflowStage {
    /// Creates a stage at the current clock time.
    #[must_use]
    pub fn new(
        workflow_name: impl Into<String>,
        position: u32,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: WorkflowStageId::new(),
            workflow_name: workflow_name.into(),
            position,
            task_id,
            created_at_utc: clock.utc(),
        }
    }
}
