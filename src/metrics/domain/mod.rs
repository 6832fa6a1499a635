//! Reliability metric shapes and their calculation.

use crate::run::domain::{Run, RunState};
use crate::task::domain::RepositoryId;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Width of the overall metrics window, in days.
pub const METRICS_WINDOW_DAYS: i64 = 30;
/// Width of the recent sub-window, in days.
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Width of the failure-trend window, in days.
pub const TREND_WINDOW_DAYS: i64 = 14;

/// Failed-run count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFailureCount {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Runs created that day that ended `Failed`.
    pub failed_runs: usize,
}

/// Reliability statistics over one set of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityStats {
    /// Runs in the 30-day window.
    pub total_runs: usize,
    /// Succeeded / (succeeded + failed) over 7 days, as a percentage
    /// rounded to one decimal; zero when no eligible runs exist.
    pub success_rate_7d: f64,
    /// The same rate over the full 30-day window.
    pub success_rate_30d: f64,
    /// One entry per calendar day over 14 days, oldest first,
    /// zero-filled.
    pub failure_trend: Vec<DailyFailureCount>,
    /// Mean run duration in seconds over runs that both started and
    /// ended, rounded to one decimal; `None` when no run qualifies.
    pub average_duration_seconds: Option<f64>,
}

impl ReliabilityStats {
    /// Folds a set of runs into reliability statistics.
    #[must_use]
    pub fn calculate(runs: &[&Run], now: DateTime<Utc>) -> Self {
        let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);

        let success_rate_30d = success_rate(runs.iter().copied());
        let success_rate_7d = success_rate(
            runs.iter()
                .copied()
                .filter(|run| run.created_at_utc() >= recent_cutoff),
        );

        Self {
            total_runs: runs.len(),
            success_rate_7d,
            success_rate_30d,
            failure_trend: failure_trend(runs, now),
            average_duration_seconds: average_duration_seconds(runs),
        }
    }
}

/// Per-repository reliability statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryReliability {
    /// Repository the statistics describe.
    pub repository_id: RepositoryId,
    /// Statistics over that repository's runs.
    pub stats: ReliabilityStats,
}

/// Reliability metrics for the whole window plus a per-repository
/// breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityMetrics {
    /// When the metrics were computed.
    pub generated_at_utc: DateTime<Utc>,
    /// Statistics over every run in the window.
    pub overall: ReliabilityStats,
    /// Per-repository breakdown, sorted by run count descending.
    pub per_repository: Vec<RepositoryReliability>,
}

impl ReliabilityMetrics {
    /// Folds a 30-day window of runs into the full metrics shape.
    #[must_use]
    pub fn calculate(runs: &[Run], now: DateTime<Utc>) -> Self {
        let all: Vec<&Run> = runs.iter().collect();
        let overall = ReliabilityStats::calculate(&all, now);

        let mut repository_ids: Vec<RepositoryId> =
            runs.iter().map(Run::repository_id).collect();
        repository_ids.sort_unstable();
        repository_ids.dedup();

        let mut per_repository: Vec<RepositoryReliability> = repository_ids
            .into_iter()
            .map(|repository_id| {
                let scoped: Vec<&Run> = runs
                    .iter()
                    .filter(|run| run.repository_id() == repository_id)
                    .collect();
                RepositoryReliability {
                    repository_id,
                    stats: ReliabilityStats::calculate(&scoped, now),
                }
            })
            .collect();
        per_repository.sort_by(|a, b| {
            b.stats
                .total_runs
                .cmp(&a.stats.total_runs)
                .then_with(|| a.repository_id.cmp(&b.repository_id))
        });

        Self {
            generated_at_utc: now,
            overall,
            per_repository,
        }
    }
}

/// Percentage of succeeded among settled (succeeded or failed) runs,
/// rounded to one decimal; zero when nothing settled.
fn success_rate<'a>(runs: impl Iterator<Item = &'a Run>) -> f64 {
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for run in runs {
        match run.state() {
            RunState::Succeeded => succeeded += 1,
            RunState::Failed => failed += 1,
            _ => {}
        }
    }
    percentage(succeeded, succeeded + failed)
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "run counts stay far below the f64 integer precision boundary"
)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

/// Failed-run counts per calendar day, oldest first, zero-filled.
fn failure_trend(runs: &[&Run], now: DateTime<Utc>) -> Vec<DailyFailureCount> {
    (0..TREND_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = (now - Duration::days(offset)).date_naive();
            let failed_runs = runs
                .iter()
                .filter(|run| {
                    run.state() == RunState::Failed
                        && run.created_at_utc().date_naive() == date
                })
                .count();
            DailyFailureCount { date, failed_runs }
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "durations in milliseconds stay far below the f64 integer precision boundary"
)]
fn average_duration_seconds(runs: &[&Run]) -> Option<f64> {
    let durations: Vec<i64> = runs
        .iter()
        .filter_map(|run| {
            let started = run.started_at_utc()?;
            let ended = run.ended_at_utc()?;
            Some((ended - started).num_milliseconds())
        })
        .collect();
    if durations.is_empty() {
        return None;
    }
    let total_ms: i64 = durations.iter().sum();
    let mean_seconds = total_ms as f64 / durations.len() as f64 / 1000.0;
    Some(round_one_decimal(mean_seconds))
}

#[expect(
    clippy::float_arithmetic,
    reason = "fixed-point rounding of observability output"
)]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
