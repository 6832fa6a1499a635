//! Task runtime aggregate and heartbeat merge logic.

use super::{RuntimeId, RuntimeState};
use crate::task::domain::{RepositoryId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Heartbeat payload a runtime reports about itself.
///
/// Absent fields leave the stored value unchanged ("none means don't
/// touch"); the error field is the one explicit exception, with
/// [`RuntimeStateUpdate::clearing_error`] as its flagged clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStateUpdate {
    runtime_id: RuntimeId,
    repository_id: Option<RepositoryId>,
    task_id: Option<TaskId>,
    state: Option<RuntimeState>,
    active_runs: Option<u32>,
    max_parallel_runs: Option<u32>,
    last_activity_utc: Option<DateTime<Utc>>,
    error: Option<String>,
    clear_error: bool,
}

impl RuntimeStateUpdate {
    /// Creates an update that touches nothing beyond the identifier.
    #[must_use]
    pub const fn new(runtime_id: RuntimeId) -> Self {
        Self {
            runtime_id,
            repository_id: None,
            task_id: None,
            state: None,
            active_runs: None,
            max_parallel_runs: None,
            last_activity_utc: None,
            error: None,
            clear_error: false,
        }
    }

    /// Returns the reporting runtime.
    #[must_use]
    pub const fn runtime_id(&self) -> &RuntimeId {
        &self.runtime_id
    }

    /// Associates the runtime with a repository.
    #[must_use]
    pub const fn with_repository(mut self, repository_id: RepositoryId) -> Self {
        self.repository_id = Some(repository_id);
        self
    }

    /// Associates the runtime with a task.
    #[must_use]
    pub const fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Reports a state transition.
    #[must_use]
    pub const fn with_state(mut self, state: RuntimeState) -> Self {
        self.state = Some(state);
        self
    }

    /// Reports the current number of active runs.
    #[must_use]
    pub const fn with_active_runs(mut self, active_runs: u32) -> Self {
        self.active_runs = Some(active_runs);
        self
    }

    /// Reports the configured parallelism ceiling.
    #[must_use]
    pub const fn with_max_parallel_runs(mut self, max_parallel_runs: u32) -> Self {
        self.max_parallel_runs = Some(max_parallel_runs);
        self
    }

    /// Reports an activity timestamp.
    #[must_use]
    pub const fn with_activity(mut self, at: DateTime<Utc>) -> Self {
        self.last_activity_utc = Some(at);
        self
    }

    /// Reports a fresh error message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Explicitly clears the stored error.
    #[must_use]
    pub const fn clearing_error(mut self) -> Self {
        self.clear_error = true;
        self
    }
}

/// Tracked state of one task runtime.
///
/// Upserted by primary key on every heartbeat and never deleted; the
/// cumulative counters only ever increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRuntime {
    runtime_id: RuntimeId,
    repository_id: Option<RepositoryId>,
    task_id: Option<TaskId>,
    state: RuntimeState,
    active_runs: u32,
    max_parallel_runs: u32,
    first_seen_at_utc: DateTime<Utc>,
    last_activity_utc: Option<DateTime<Utc>>,
    state_changed_at_utc: DateTime<Utc>,
    last_started_at_utc: Option<DateTime<Utc>>,
    last_ready_at_utc: Option<DateTime<Utc>>,
    last_inactive_at_utc: Option<DateTime<Utc>>,
    cold_start_count: u64,
    cold_start_duration_total_ms: u64,
    last_cold_start_ms: Option<u64>,
    inactive_transition_count: u64,
    inactive_duration_total_ms: u64,
    last_inactive_ms: Option<u64>,
    last_error: Option<String>,
}

impl TaskRuntime {
    /// Registers a runtime on first sighting.
    #[must_use]
    pub fn register(update: RuntimeStateUpdate, clock: &impl Clock) -> Self {
        let now = clock.utc();
        let state = update.state.unwrap_or(RuntimeState::Cold);
        Self {
            runtime_id: update.runtime_id,
            repository_id: update.repository_id,
            task_id: update.task_id,
            state,
            active_runs: update.active_runs.unwrap_or(0),
            max_parallel_runs: update.max_parallel_runs.unwrap_or(1),
            first_seen_at_utc: now,
            last_activity_utc: update.last_activity_utc.or(Some(now)),
            state_changed_at_utc: now,
            last_started_at_utc: (state == RuntimeState::Starting).then_some(now),
            last_ready_at_utc: (state == RuntimeState::Ready).then_some(now),
            last_inactive_at_utc: (state == RuntimeState::Inactive).then_some(now),
            cold_start_count: 0,
            cold_start_duration_total_ms: 0,
            last_cold_start_ms: None,
            inactive_transition_count: 0,
            inactive_duration_total_ms: 0,
            last_inactive_ms: None,
            last_error: update.error,
        }
    }

    /// Merges a heartbeat into the tracked state, deriving telemetry.
    ///
    /// Derived rules:
    /// - entering `Starting` records the start timestamp;
    /// - entering `Ready` from `Cold`/`Starting` with a start timestamp
    ///   chronologically before now records one cold start;
    /// - entering `Inactive` from another state with a valid prior
    ///   activity timestamp records one inactive stretch;
    /// - the state-change timestamp moves only when the state actually
    ///   changes;
    /// - leaving `Failed` clears the stored error unless the heartbeat
    ///   carries a fresh one.
    pub fn apply(&mut self, update: RuntimeStateUpdate, clock: &impl Clock) {
        let now = clock.utc();
        let previous_state = self.state;
        let previous_activity = self.last_activity_utc;

        if let Some(repository_id) = update.repository_id {
            self.repository_id = Some(repository_id);
        }
        if let Some(task_id) = update.task_id {
            self.task_id = Some(task_id);
        }
        if let Some(active_runs) = update.active_runs {
            self.active_runs = active_runs;
        }
        if let Some(max_parallel_runs) = update.max_parallel_runs {
            self.max_parallel_runs = max_parallel_runs;
        }

        if let Some(new_state) = update.state.filter(|state| *state != previous_state) {
            self.state = new_state;
            self.state_changed_at_utc = now;
            match new_state {
                RuntimeState::Starting => self.last_started_at_utc = Some(now),
                RuntimeState::Ready => self.record_ready(previous_state, now),
                RuntimeState::Inactive => self.record_inactive(previous_activity, now),
                RuntimeState::Cold | RuntimeState::Busy | RuntimeState::Failed => {}
            }
            if previous_state == RuntimeState::Failed && update.error.is_none() {
                self.last_error = None;
            }
        }

        if let Some(error) = update.error {
            self.last_error = Some(error);
        }
        if update.clear_error {
            self.last_error = None;
        }
        if let Some(activity) = update.last_activity_utc {
            self.last_activity_utc = Some(activity);
        }
    }

    fn record_ready(&mut self, previous_state: RuntimeState, now: DateTime<Utc>) {
        self.last_ready_at_utc = Some(now);
        let from_boot = matches!(previous_state, RuntimeState::Cold | RuntimeState::Starting);
        let elapsed = self
            .last_started_at_utc
            .filter(|started| from_boot && *started < now)
            .map(|started| elapsed_ms(started, now));
        if let Some(cold_start_ms) = elapsed {
            self.cold_start_count += 1;
            self.cold_start_duration_total_ms += cold_start_ms;
            self.last_cold_start_ms = Some(cold_start_ms);
        }
    }

    fn record_inactive(&mut self, previous_activity: Option<DateTime<Utc>>, now: DateTime<Utc>) {
        self.last_inactive_at_utc = Some(now);
        let elapsed = previous_activity
            .filter(|activity| *activity < now)
            .map(|activity| elapsed_ms(activity, now));
        if let Some(idle_ms) = elapsed {
            self.inactive_transition_count += 1;
            self.inactive_duration_total_ms += idle_ms;
            self.last_inactive_ms = Some(idle_ms);
        }
    }

    /// Returns the runtime identifier.
    #[must_use]
    pub const fn runtime_id(&self) -> &RuntimeId {
        &self.runtime_id
    }

    /// Returns the associated repository, if reported.
    #[must_use]
    pub const fn repository_id(&self) -> Option<RepositoryId> {
        self.repository_id
    }

    /// Returns the associated task, if reported.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RuntimeState {
        self.state
    }

    /// Returns the reported number of active runs.
    #[must_use]
    pub const fn active_runs(&self) -> u32 {
        self.active_runs
    }

    /// Returns the reported parallelism ceiling.
    #[must_use]
    pub const fn max_parallel_runs(&self) -> u32 {
        self.max_parallel_runs
    }

    /// Returns when the runtime was first seen.
    #[must_use]
    pub const fn first_seen_at_utc(&self) -> DateTime<Utc> {
        self.first_seen_at_utc
    }

    /// Returns the last reported activity timestamp.
    #[must_use]
    pub const fn last_activity_utc(&self) -> Option<DateTime<Utc>> {
        self.last_activity_utc
    }

    /// Returns when the state last actually changed.
    #[must_use]
    pub const fn state_changed_at_utc(&self) -> DateTime<Utc> {
        self.state_changed_at_utc
    }

    /// Returns when the runtime last entered `Starting`.
    #[must_use]
    pub const fn last_started_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_started_at_utc
    }

    /// Returns when the runtime last became `Ready`.
    #[must_use]
    pub const fn last_ready_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_ready_at_utc
    }

    /// Returns when the runtime last became `Inactive`.
    #[must_use]
    pub const fn last_inactive_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_inactive_at_utc
    }

    /// Returns the number of recorded cold starts.
    #[must_use]
    pub const fn cold_start_count(&self) -> u64 {
        self.cold_start_count
    }

    /// Returns the cumulative cold-start duration in milliseconds.
    #[must_use]
    pub const fn cold_start_duration_total_ms(&self) -> u64 {
        self.cold_start_duration_total_ms
    }

    /// Returns the most recent cold-start duration in milliseconds.
    #[must_use]
    pub const fn last_cold_start_ms(&self) -> Option<u64> {
        self.last_cold_start_ms
    }

    /// Returns the number of recorded transitions into `Inactive`.
    #[must_use]
    pub const fn inactive_transition_count(&self) -> u64 {
        self.inactive_transition_count
    }

    /// Returns the cumulative pre-inactive idle duration in milliseconds.
    #[must_use]
    pub const fn inactive_duration_total_ms(&self) -> u64 {
        self.inactive_duration_total_ms
    }

    /// Returns the most recent pre-inactive idle duration in milliseconds.
    #[must_use]
    pub const fn last_inactive_ms(&self) -> Option<u64> {
        self.last_inactive_ms
    }

    /// Returns the last reported error, if the runtime is unhealthy.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}
