//! Tool projection: a deduplicated view of one tool invocation.

use super::{ToolCallObservation, ToolProjectionId};
use crate::run::domain::RunId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Derived view of a tool invocation assembled from one or more
/// structured events.
///
/// The sequence range only ever widens: `sequence_start` never increases
/// and `sequence_end` never decreases across merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProjection {
    id: ToolProjectionId,
    run_id: RunId,
    tool_call_id: Option<String>,
    tool_name: Option<String>,
    status: Option<String>,
    input_json: Option<Value>,
    output_json: Option<Value>,
    sequence_start: u64,
    sequence_end: u64,
    updated_at_utc: DateTime<Utc>,
}

impl ToolProjection {
    /// Creates a projection from its first observation.
    #[must_use]
    pub fn from_observation(observation: ToolCallObservation, clock: &impl Clock) -> Self {
        Self {
            id: ToolProjectionId::new(),
            run_id: observation.run_id,
            tool_call_id: observation.tool_call_id,
            tool_name: observation.tool_name,
            status: observation.status,
            input_json: observation.input_json,
            output_json: observation.output_json,
            sequence_start: observation.sequence,
            sequence_end: observation.sequence,
            updated_at_utc: clock.utc(),
        }
    }

    /// Absorbs a further observation of the same invocation.
    ///
    /// Widens the sequence range monotonically and overwrites descriptive
    /// fields with the latest event's values where it provides them.
    pub fn absorb(&mut self, observation: ToolCallObservation, clock: &impl Clock) {
        self.sequence_start = self.sequence_start.min(observation.sequence);
        self.sequence_end = self.sequence_end.max(observation.sequence);
        if observation.tool_call_id.is_some() {
            self.tool_call_id = observation.tool_call_id;
        }
        if observation.tool_name.is_some() {
            self.tool_name = observation.tool_name;
        }
        if observation.status.is_some() {
            self.status = observation.status;
        }
        if observation.input_json.is_some() {
            self.input_json = observation.input_json;
        }
        if observation.output_json.is_some() {
            self.output_json = observation.output_json;
        }
        self.updated_at_utc = clock.utc();
    }

    /// Returns whether an observation belongs to this projection.
    ///
    /// Identity matches by tool-call id when both sides carry one;
    /// otherwise a sequence adjacent to or inside the current range
    /// continues the same invocation.
    #[must_use]
    pub fn matches(&self, observation: &ToolCallObservation) -> bool {
        if self.run_id != observation.run_id {
            return false;
        }
        match (&self.tool_call_id, &observation.tool_call_id) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => {
                observation.sequence >= self.sequence_start.saturating_sub(1)
                    && observation.sequence <= self.sequence_end.saturating_add(1)
            }
        }
    }

    /// Returns the projection identifier.
    #[must_use]
    pub const fn id(&self) -> ToolProjectionId {
        self.id
    }

    /// Returns the owning run.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the tool-call identity, if observed.
    #[must_use]
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }

    /// Returns the tool name, if observed.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Returns the latest reported status, if observed.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the latest input payload, if observed.
    #[must_use]
    pub const fn input_json(&self) -> Option<&Value> {
        self.input_json.as_ref()
    }

    /// Returns the latest output payload, if observed.
    #[must_use]
    pub const fn output_json(&self) -> Option<&Value> {
        self.output_json.as_ref()
    }

    /// Returns the first contributing sequence.
    #[must_use]
    pub const fn sequence_start(&self) -> u64 {
        self.sequence_start
    }

    /// Returns the last contributing sequence.
    #[must_use]
    pub const fn sequence_end(&self) -> u64 {
        self.sequence_end
    }

    /// Returns when the projection last absorbed an event.
    #[must_use]
    pub const fn updated_at_utc(&self) -> DateTime<Utc> {
        self.updated_at_utc
    }
}
