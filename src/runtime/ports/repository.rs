//! Repository port for runtime records.
//!
//! Runtimes are upserted by primary key on every heartbeat and never
//! deleted, so the port has no remove operation.

use crate::runtime::domain::{RuntimeId, TaskRuntime};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for runtime repository operations.
pub type RuntimeRepositoryResult<T> = Result<T, RuntimeRepositoryError>;

/// Runtime persistence contract.
#[async_trait]
pub trait RuntimeRepository: Send + Sync {
    /// Inserts or replaces the record for a runtime.
    async fn upsert(&self, runtime: &TaskRuntime) -> RuntimeRepositoryResult<()>;

    /// Finds a runtime by identifier.
    async fn find_by_id(&self, id: &RuntimeId) -> RuntimeRepositoryResult<Option<TaskRuntime>>;

    /// Returns every tracked runtime.
    async fn list_all(&self) -> RuntimeRepositoryResult<Vec<TaskRuntime>>;
}

/// Errors returned by runtime repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RuntimeRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RuntimeRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
