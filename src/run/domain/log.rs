//! Thin side records attached to a run: log entries and diff snapshots.

use super::{DiffSnapshotId, RunId, RunLogId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a run log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLogLevel {
    /// Routine progress output.
    Info,
    /// Something surprising that did not stop the run.
    Warning,
    /// A failure the runner reported.
    Error,
}

impl RunLogLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for RunLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured line of runner output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    /// Log entry identifier.
    pub id: RunLogId,
    /// Owning run.
    pub run_id: RunId,
    /// Capture timestamp.
    pub timestamp_utc: DateTime<Utc>,
    /// Severity.
    pub level: RunLogLevel,
    /// Raw message text.
    pub message: String,
}

impl RunLogEntry {
    /// Captures a log line for a run at the current clock time.
    #[must_use]
    pub fn capture(
        run_id: RunId,
        level: RunLogLevel,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: RunLogId::new(),
            run_id,
            timestamp_utc: clock.utc(),
            level,
            message: message.into(),
        }
    }
}

/// A captured file diff produced by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSnapshot {
    /// Snapshot identifier.
    pub id: DiffSnapshotId,
    /// Owning run.
    pub run_id: RunId,
    /// Repository-relative path of the changed file.
    pub file_path: String,
    /// Unified diff text.
    pub patch: String,
    /// Capture timestamp.
    pub created_at_utc: DateTime<Utc>,
}

impl DiffSnapshot {
    /// Captures a file diff for a run at the current clock time.
    #[must_use]
    pub fn capture(
        run_id: RunId,
        file_path: impl Into<String>,
        patch: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: DiffSnapshotId::new(),
            run_id,
            file_path: file_path.into(),
            patch: patch.into(),
            created_at_utc: clock.utc(),
        }
    }
}
