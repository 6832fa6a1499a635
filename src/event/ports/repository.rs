//! Repository ports for structured events and tool projections.

use crate::event::domain::{StructuredEvent, ToolProjection};
use crate::run::domain::RunId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event repository operations.
pub type EventRepositoryResult<T> = Result<T, EventRepositoryError>;

/// Structured event persistence contract.
///
/// Events are keyed by `(run_id, sequence)`: upserting an existing key
/// replaces the stored record rather than duplicating it.
#[async_trait]
pub trait StructuredEventRepository: Send + Sync {
    /// Inserts or replaces the event at its natural key.
    async fn upsert(&self, event: &StructuredEvent) -> EventRepositoryResult<()>;

    /// Returns all events of a run ordered by sequence.
    async fn list_by_run(&self, run_id: RunId) -> EventRepositoryResult<Vec<StructuredEvent>>;

    /// Removes events for any of the given runs, returning the removed
    /// count.
    async fn delete_by_runs(&self, run_ids: &[RunId]) -> EventRepositoryResult<usize>;
}

/// Tool projection persistence contract.
#[async_trait]
pub trait ToolProjectionRepository: Send + Sync {
    /// Inserts or replaces a projection by identifier.
    async fn upsert(&self, projection: &ToolProjection) -> EventRepositoryResult<()>;

    /// Returns all projections of a run ordered by sequence range.
    async fn list_by_run(&self, run_id: RunId) -> EventRepositoryResult<Vec<ToolProjection>>;

    /// Removes projections for any of the given runs, returning the
    /// removed count.
    async fn delete_by_runs(&self, run_ids: &[RunId]) -> EventRepositoryResult<usize>;
}

/// Errors returned by event-collection repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EventRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
