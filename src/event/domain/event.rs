//! Structured event record and ingestion normalisation.

use crate::run::domain::RunId;
use crate::task::domain::{RepositoryId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Default schema version stamped on events that do not carry one.
const DEFAULT_SCHEMA_VERSION: u32 = 1;

/// Raw event payload as reported by a runner.
///
/// Everything beyond the `(run_id, sequence)` key is optional; ingestion
/// normalises the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredEventDraft {
    /// Owning run.
    pub run_id: RunId,
    /// Sequence number unique within the run.
    pub sequence: u64,
    /// Reported event type.
    pub event_type: Option<String>,
    /// Reported category.
    pub category: Option<String>,
    /// Reported one-line summary.
    pub summary: Option<String>,
    /// Reported error text.
    pub error: Option<String>,
    /// Raw JSON payload text; may be malformed and is stored as-is.
    pub payload_json: Option<String>,
    /// Reported schema version.
    pub schema_version: Option<u32>,
    /// Reported timestamp.
    pub timestamp_utc: Option<DateTime<Utc>>,
    /// Repository reference, backfilled from the run when absent.
    pub repository_id: Option<RepositoryId>,
    /// Task reference, backfilled from the run when absent.
    pub task_id: Option<TaskId>,
}

impl StructuredEventDraft {
    /// Creates a draft with only the natural key set.
    #[must_use]
    pub fn new(run_id: RunId, sequence: u64) -> Self {
        Self {
            run_id,
            sequence,
            ..Self::default()
        }
    }

    /// Sets the reported event type.
    #[must_use]
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the reported category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the reported summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the reported error text.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Sets the raw JSON payload text.
    #[must_use]
    pub fn with_payload(mut self, payload_json: impl Into<String>) -> Self {
        self.payload_json = Some(payload_json.into());
        self
    }

    /// Sets the reported schema version.
    #[must_use]
    pub const fn with_schema_version(mut self, schema_version: u32) -> Self {
        self.schema_version = Some(schema_version);
        self
    }

    /// Sets the reported timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp_utc: DateTime<Utc>) -> Self {
        self.timestamp_utc = Some(timestamp_utc);
        self
    }
}

/// A normalised, stored structured event.
///
/// `(run_id, sequence)` is the natural key: re-ingesting the same
/// sequence updates the stored record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredEvent {
    run_id: RunId,
    sequence: u64,
    repository_id: Option<RepositoryId>,
    task_id: Option<TaskId>,
    event_type: String,
    category: String,
    summary: String,
    error: String,
    payload_json: String,
    schema_version: u32,
    timestamp_utc: DateTime<Utc>,
}

impl StructuredEvent {
    /// Normalises a draft into a storable event.
    ///
    /// String fields are trimmed and defaulted to empty; a missing event
    /// type becomes `"unknown"`; a missing timestamp is stamped from the
    /// clock.
    #[must_use]
    pub fn normalize(draft: StructuredEventDraft, clock: &impl Clock) -> Self {
        let event_type = normalize_string(draft.event_type);
        Self {
            run_id: draft.run_id,
            sequence: draft.sequence,
            repository_id: draft.repository_id,
            task_id: draft.task_id,
            event_type: if event_type.is_empty() {
                "unknown".to_owned()
            } else {
                event_type
            },
            category: normalize_string(draft.category),
            summary: normalize_string(draft.summary),
            error: normalize_string(draft.error),
            payload_json: normalize_string(draft.payload_json),
            schema_version: draft.schema_version.unwrap_or(DEFAULT_SCHEMA_VERSION),
            timestamp_utc: draft.timestamp_utc.unwrap_or_else(|| clock.utc()),
        }
    }

    /// Backfills repository and task references from the parent run.
    ///
    /// Already-set references are left untouched.
    pub fn backfill_origin(&mut self, repository_id: RepositoryId, task_id: TaskId) {
        if self.repository_id.is_none() {
            self.repository_id = Some(repository_id);
        }
        if self.task_id.is_none() {
            self.task_id = Some(task_id);
        }
    }

    /// Returns the owning run.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the sequence number within the run.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the repository reference, if known.
    #[must_use]
    pub const fn repository_id(&self) -> Option<RepositoryId> {
        self.repository_id
    }

    /// Returns the task reference, if known.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the normalised event type.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the normalised category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the normalised summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the normalised error text.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Returns the raw payload text, possibly malformed JSON.
    #[must_use]
    pub fn payload_json(&self) -> &str {
        &self.payload_json
    }

    /// Returns the schema version.
    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn timestamp_utc(&self) -> DateTime<Utc> {
        self.timestamp_utc
    }
}

fn normalize_string(value: Option<String>) -> String {
    value.map_or_else(String::new, |raw| raw.trim().to_owned())
}
