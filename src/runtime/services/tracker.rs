//! Service layer for runtime heartbeats and fleet telemetry.

use crate::runtime::{
    domain::{RuntimeStateUpdate, RuntimeTelemetrySnapshot, TaskRuntime},
    ports::{RuntimeRepository, RuntimeRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for runtime telemetry operations.
#[derive(Debug, Error)]
pub enum RuntimeTelemetryError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RuntimeRepositoryError),
}

/// Result type for runtime telemetry service operations.
pub type RuntimeTelemetryResult<T> = Result<T, RuntimeTelemetryError>;

/// Runtime heartbeat and telemetry orchestration service.
#[derive(Clone)]
pub struct RuntimeTelemetryService<C>
where
    C: Clock + Send + Sync,
{
    repository: Arc<dyn RuntimeRepository>,
    clock: Arc<C>,
}

impl<C> RuntimeTelemetryService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new runtime telemetry service.
    #[must_use]
    pub const fn new(repository: Arc<dyn RuntimeRepository>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Applies a heartbeat, registering the runtime on first sighting.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeTelemetryError::Repository`] when persistence
    /// fails.
    pub async fn upsert_state(
        &self,
        update: RuntimeStateUpdate,
    ) -> RuntimeTelemetryResult<TaskRuntime> {
        let existing = self.repository.find_by_id(update.runtime_id()).await?;
        let runtime = match existing {
            Some(mut tracked) => {
                tracked.apply(update, &*self.clock);
                tracked
            }
            None => {
                debug!(runtime_id = %update.runtime_id(), "runtime first sighting");
                TaskRuntime::register(update, &*self.clock)
            }
        };
        self.repository.upsert(&runtime).await?;
        Ok(runtime)
    }

    /// Aggregates telemetry across every tracked runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeTelemetryError::Repository`] when the listing
    /// fails.
    pub async fn telemetry_snapshot(&self) -> RuntimeTelemetryResult<RuntimeTelemetrySnapshot> {
        let runtimes = self.repository.list_all().await?;
        Ok(RuntimeTelemetrySnapshot::aggregate(&runtimes))
    }
}
