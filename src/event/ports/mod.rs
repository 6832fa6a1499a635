//! Port contracts for structured events and tool projections.

pub mod repository;

pub use repository::{
    EventRepositoryError, EventRepositoryResult, StructuredEventRepository,
    ToolProjectionRepository,
};
