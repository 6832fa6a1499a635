//! Identifier types for the runtime domain.

use super::RuntimeDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier a runtime reports for itself.
///
/// Runtime identifiers are minted by the compute layer, not by this
/// crate, so they are validated strings rather than generated UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeId(String);

impl RuntimeId {
    /// Creates a validated runtime identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeDomainError::EmptyRuntimeId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, RuntimeDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RuntimeDomainError::EmptyRuntimeId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RuntimeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
