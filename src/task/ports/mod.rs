//! Port contracts for task persistence and due-task queries.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
