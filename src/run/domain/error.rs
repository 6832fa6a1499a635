//! Error types for run domain validation and parsing.

use super::{RunId, RunState};
use thiserror::Error;

/// Errors returned while mutating run aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunDomainError {
    /// The requested transition is not permitted from the current state.
    ///
    /// Callers racing against a concurrent transition should treat this as
    /// "state did not apply", not as a fault.
    #[error("run {run_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Run being mutated.
        run_id: RunId,
        /// Current state.
        from: RunState,
        /// Requested state.
        to: RunState,
    },
}

/// Error returned while parsing run states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown run state: {0}")]
pub struct ParseRunStateError(pub String);
