//! Port contracts for semantic chunk persistence.

pub mod repository;

pub use repository::{
    SemanticChunkRepository, SemanticChunkRepositoryError, SemanticChunkRepositoryResult,
};
