//! Application services for finding triage.

mod triage;

pub use triage::{FindingTriageError, FindingTriageResult, FindingTriageService};
