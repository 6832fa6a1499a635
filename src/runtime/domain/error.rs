//! Error types for runtime domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing runtime domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeDomainError {
    /// The runtime identifier is empty after trimming.
    #[error("runtime identifier must not be empty")]
    EmptyRuntimeId,
}

/// Error returned while parsing runtime states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown runtime state: {0}")]
pub struct ParseRuntimeStateError(pub String);
