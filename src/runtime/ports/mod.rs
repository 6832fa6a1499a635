//! Port contracts for runtime persistence.

pub mod repository;

pub use repository::{RuntimeRepository, RuntimeRepositoryError, RuntimeRepositoryResult};
