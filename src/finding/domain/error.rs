//! Error types for finding domain validation and parsing.

use super::{FindingId, FindingState};
use thiserror::Error;

/// Errors returned while mutating finding records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FindingDomainError {
    /// The finding title is empty after trimming.
    #[error("finding title must not be empty")]
    EmptyTitle,

    /// The requested state change is not allowed.
    #[error("finding {finding_id} cannot move from {from} to {to}")]
    InvalidStateChange {
        /// Finding being mutated.
        finding_id: FindingId,
        /// Current state.
        from: FindingState,
        /// Requested state.
        to: FindingState,
    },
}

/// Error returned while parsing finding states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown finding state: {0}")]
pub struct ParseFindingStateError(pub String);
