//! Port contracts for finding persistence.

pub mod repository;

pub use repository::{FindingRepository, FindingRepositoryError, FindingRepositoryResult};
