//! Port contracts for run persistence and run side collections.
//!
//! Ports define infrastructure-agnostic interfaces used by run services
//! and by the retention engine.

pub mod repository;

pub use repository::{
    DiffSnapshotRepository, RunLogRepository, RunRepository, RunRepositoryError,
    RunRepositoryResult,
};
