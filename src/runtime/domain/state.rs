//! Runtime lifecycle state.

use super::ParseRuntimeStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state a runtime reports for itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeState {
    /// Provisioned but not yet started.
    Cold,
    /// Booting towards readiness.
    Starting,
    /// Ready to accept runs.
    Ready,
    /// Executing at least one run.
    Busy,
    /// Idle long enough to be parked.
    Inactive,
    /// Crashed or otherwise unhealthy.
    Failed,
}

impl RuntimeState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Inactive => "inactive",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RuntimeState {
    type Error = ParseRuntimeStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "cold" => Ok(Self::Cold),
            "starting" => Ok(Self::Starting),
            "ready" => Ok(Self::Ready),
            "busy" => Ok(Self::Busy),
            "inactive" => Ok(Self::Inactive),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseRuntimeStateError(value.to_owned())),
        }
    }
}
