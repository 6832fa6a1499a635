//! Identifier types for the event domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a tool projection record.
///
/// Structured events themselves need no generated identifier: they are
/// keyed naturally by `(run_id, sequence)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolProjectionId(Uuid);

impl ToolProjectionId {
    /// Creates a new random projection identifier.
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

impl Default for ToolProjectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToolProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
