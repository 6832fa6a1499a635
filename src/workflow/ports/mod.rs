//! Port contracts for workflow stage lookups.

pub mod repository;

pub use repository::{
    WorkflowStageRepository, WorkflowStageRepositoryError, WorkflowStageRepositoryResult,
};
