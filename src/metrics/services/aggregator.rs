//! Service layer for reliability metric aggregation.

use crate::metrics::domain::{METRICS_WINDOW_DAYS, ReliabilityMetrics};
use crate::run::ports::{RunRepository, RunRepositoryError};
use crate::task::domain::RepositoryId;
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for metric aggregation.
#[derive(Debug, Error)]
pub enum ReliabilityMetricsError {
    /// Run repository operation failed.
    #[error(transparent)]
    Repository(#[from] RunRepositoryError),
}

/// Result type for metric aggregation operations.
pub type ReliabilityMetricsResult<T> = Result<T, ReliabilityMetricsError>;

/// Reliability metrics aggregation service.
#[derive(Clone)]
pub struct ReliabilityMetricsService<C>
where
    C: Clock + Send + Sync,
{
    runs: Arc<dyn RunRepository>,
    clock: Arc<C>,
}

impl<C> ReliabilityMetricsService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new metrics service.
    #[must_use]
    pub const fn new(runs: Arc<dyn RunRepository>, clock: Arc<C>) -> Self {
        Self { runs, clock }
    }

    /// Computes reliability metrics over the trailing 30-day window.
    ///
    /// With a repository scope, only that repository's runs are
    /// considered (the per-repository breakdown then has at most one
    /// entry).
    ///
    /// # Errors
    ///
    /// Returns [`ReliabilityMetricsError::Repository`] when the window
    /// fetch fails.
    pub async fn metrics(
        &self,
        scope: Option<RepositoryId>,
    ) -> ReliabilityMetricsResult<ReliabilityMetrics> {
        let now = self.clock.utc();
        let since = now - Duration::days(METRICS_WINDOW_DAYS);
        let mut runs = self.runs.list_created_since(since).await?;
        if let Some(repository_id) = scope {
            runs.retain(|run| run.repository_id() == repository_id);
        }
        Ok(ReliabilityMetrics::calculate(&runs, now))
    }
}
