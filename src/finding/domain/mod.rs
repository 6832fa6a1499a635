//! Domain model for findings.

mod error;
mod finding;
mod ids;

pub use error::{FindingDomainError, ParseFindingStateError};
pub use finding::{Finding, FindingSeverity, FindingState, PersistedFindingData};
pub use ids::FindingId;
