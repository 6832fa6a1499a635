//! Next-occurrence computation for task schedules.
//!
//! Cron expressions are evaluated in UTC through the `cron` crate, which
//! expects a seconds field. Five-field expressions (`min..dow`) are
//! normalised by prepending `0`; six-field expressions pass through
//! unchanged; anything else is invalid.

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

use super::TaskKind;

/// Normalises a cron expression to the six-field form the parser expects.
///
/// Returns `None` when the field count is neither five nor six.
#[must_use]
pub fn normalize_cron_expression(expression: &str) -> Option<String> {
    let trimmed = expression.trim();
    match trimmed.split_whitespace().count() {
        5 => Some(format!("0 {trimmed}")),
        6 => Some(trimmed.to_owned()),
        _ => None,
    }
}

/// Returns whether a cron expression parses after normalisation.
#[must_use]
pub fn cron_expression_is_valid(expression: &str) -> bool {
    normalize_cron_expression(expression)
        .is_some_and(|normalized| Schedule::from_str(&normalized).is_ok())
}

/// Computes the next occurrence of a cron expression strictly after `after`.
///
/// Returns `None` when the expression is empty, malformed, or yields no
/// further occurrences.
#[must_use]
pub fn next_occurrence(expression: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let normalized = normalize_cron_expression(expression)?;
    let schedule = Schedule::from_str(&normalized).ok()?;
    schedule.after(&after).next()
}

/// Computes `next_run_at_utc` for a task of the given shape.
///
/// Pure over its inputs: disabled tasks yield `None`; one-shot tasks are
/// immediately due; cron tasks yield the next occurrence strictly after
/// `now` (or `None` when the expression does not parse); event-driven
/// tasks are dispatched externally and never carry a next-run timestamp.
#[must_use]
pub fn compute_next_run(
    kind: TaskKind,
    enabled: bool,
    cron_expression: Option<&str>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !enabled {
        return None;
    }
    match kind {
        TaskKind::OneShot => Some(now),
        TaskKind::Cron => cron_expression
            .filter(|expression| !expression.trim().is_empty())
            .and_then(|expression| next_occurrence(expression, now)),
        TaskKind::EventDriven => None,
    }
}
