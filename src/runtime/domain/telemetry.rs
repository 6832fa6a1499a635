//! Fleet-wide telemetry aggregation over tracked runtimes.

use super::{RuntimeState, TaskRuntime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MS_PER_SECOND: f64 = 1000.0;

/// Aggregated telemetry across every tracked runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeTelemetrySnapshot {
    /// Number of tracked runtimes.
    pub total_runtimes: usize,
    /// Runtime count per state.
    pub state_counts: BTreeMap<RuntimeState, usize>,
    /// Total recorded cold starts.
    pub cold_start_count: u64,
    /// Summed cold-start seconds.
    pub cold_start_seconds_total: f64,
    /// Mean cold-start seconds; zero when nothing was recorded.
    pub cold_start_seconds_average: f64,
    /// Most recently observed cold-start seconds, if any.
    pub last_cold_start_seconds: Option<f64>,
    /// Total recorded transitions into inactivity.
    pub inactive_transition_count: u64,
    /// Summed pre-inactive idle seconds.
    pub inactive_seconds_total: f64,
    /// Mean pre-inactive idle seconds; zero when nothing was recorded.
    pub inactive_seconds_average: f64,
    /// Most recently observed pre-inactive idle seconds, if any.
    pub last_inactive_seconds: Option<f64>,
}

impl RuntimeTelemetrySnapshot {
    /// Folds the tracked runtimes into one snapshot.
    ///
    /// Averages over empty sets are zero, never an error or `NaN`.
    #[must_use]
    pub fn aggregate(runtimes: &[TaskRuntime]) -> Self {
        let mut state_counts: BTreeMap<RuntimeState, usize> = BTreeMap::new();
        let mut cold_start_count = 0u64;
        let mut cold_start_total_ms = 0u64;
        let mut inactive_transition_count = 0u64;
        let mut inactive_total_ms = 0u64;

        for runtime in runtimes {
            *state_counts.entry(runtime.state()).or_insert(0) += 1;
            cold_start_count += runtime.cold_start_count();
            cold_start_total_ms += runtime.cold_start_duration_total_ms();
            inactive_transition_count += runtime.inactive_transition_count();
            inactive_total_ms += runtime.inactive_duration_total_ms();
        }

        let last_cold_start_seconds = runtimes
            .iter()
            .filter(|runtime| runtime.last_cold_start_ms().is_some())
            .max_by_key(|runtime| runtime.last_ready_at_utc())
            .and_then(TaskRuntime::last_cold_start_ms)
            .map(ms_to_seconds);
        let last_inactive_seconds = runtimes
            .iter()
            .filter(|runtime| runtime.last_inactive_ms().is_some())
            .max_by_key(|runtime| runtime.last_inactive_at_utc())
            .and_then(TaskRuntime::last_inactive_ms)
            .map(ms_to_seconds);

        Self {
            total_runtimes: runtimes.len(),
            state_counts,
            cold_start_count,
            cold_start_seconds_total: ms_to_seconds(cold_start_total_ms),
            cold_start_seconds_average: average_seconds(cold_start_total_ms, cold_start_count),
            last_cold_start_seconds,
            inactive_transition_count,
            inactive_seconds_total: ms_to_seconds(inactive_total_ms),
            inactive_seconds_average: average_seconds(inactive_total_ms, inactive_transition_count),
            last_inactive_seconds,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "telemetry durations are far below the 2^52 ms precision boundary"
)]
fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / MS_PER_SECOND
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "averages are observability output, not control flow"
)]
fn average_seconds(total_ms: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    ms_to_seconds(total_ms) / count as f64
}
