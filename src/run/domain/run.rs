//! Run aggregate root and lifecycle state machine.

use super::{ParseRunStateError, RunDomainError, RunId};
use crate::runtime::domain::RuntimeId;
use crate::task::domain::{ProjectId, RepositoryId, Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Waiting for a runtime to pick the run up.
    Queued,
    /// Executing on a runtime.
    Running,
    /// Finished successfully.
    Succeeded,
    /// Finished with a failure.
    Failed,
    /// Stopped by an operator or the dispatcher.
    Cancelled,
    /// Waiting for an operator decision before dispatch.
    PendingApproval,
    /// Superseded; its outcome no longer matters.
    Obsolete,
}

impl RunState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::PendingApproval => "pending_approval",
            Self::Obsolete => "obsolete",
        }
    }

    /// Returns whether the run still occupies dispatcher attention.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::Running | Self::PendingApproval)
    }

    /// Returns whether the run has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Cancelled | Self::Obsolete
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RunState {
    type Error = ParseRunStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "pending_approval" => Ok(Self::PendingApproval),
            "obsolete" => Ok(Self::Obsolete),
            _ => Err(ParseRunStateError(value.to_owned())),
        }
    }
}

/// Provenance of the runtime image a run executed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProvenance {
    /// Image reference (registry/name:tag) the runtime was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Content digest of the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
}

/// Outcome payload for completing a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCompletion {
    /// Whether the run succeeded.
    pub succeeded: bool,
    /// Operator-facing outcome summary; defaulted when blank.
    pub summary: String,
    /// Structured runner output.
    pub output_json: Option<Value>,
    /// Advisory failure classification.
    pub failure_class: Option<String>,
    /// Pull request the run produced, if any.
    pub pr_url: Option<String>,
}

impl RunCompletion {
    /// Creates a completion outcome with the given success flag and summary.
    #[must_use]
    pub fn new(succeeded: bool, summary: impl Into<String>) -> Self {
        Self {
            succeeded,
            summary: summary.into(),
            output_json: None,
            failure_class: None,
            pr_url: None,
        }
    }

    /// Attaches structured runner output.
    #[must_use]
    pub fn with_output(mut self, output_json: Value) -> Self {
        self.output_json = Some(output_json);
        self
    }

    /// Attaches an advisory failure classification.
    #[must_use]
    pub fn with_failure_class(mut self, failure_class: impl Into<String>) -> Self {
        self.failure_class = Some(failure_class.into());
        self
    }

    /// Attaches the pull request URL the run produced.
    #[must_use]
    pub fn with_pr_url(mut self, pr_url: impl Into<String>) -> Self {
        self.pr_url = Some(pr_url.into());
        self
    }
}

/// Run aggregate root.
///
/// Mutated only through the named transition operations; every operation
/// checks its precondition against the current state and reports an
/// [`RunDomainError::InvalidStateTransition`] that callers treat as a
/// benign race rather than a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    id: RunId,
    task_id: TaskId,
    repository_id: RepositoryId,
    project_id: ProjectId,
    state: RunState,
    attempt: u32,
    created_at_utc: DateTime<Utc>,
    started_at_utc: Option<DateTime<Utc>>,
    ended_at_utc: Option<DateTime<Utc>>,
    summary: String,
    output_json: Option<Value>,
    failure_class: Option<String>,
    pr_url: Option<String>,
    runtime_id: Option<RuntimeId>,
    image_provenance: ImageProvenance,
}

/// Parameter object for reconstructing a persisted run aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRunData {
    /// Persisted run identifier.
    pub id: RunId,
    /// Persisted task reference.
    pub task_id: TaskId,
    /// Persisted repository reference.
    pub repository_id: RepositoryId,
    /// Persisted project reference.
    pub project_id: ProjectId,
    /// Persisted lifecycle state.
    pub state: RunState,
    /// Persisted attempt counter.
    pub attempt: u32,
    /// Persisted creation timestamp.
    pub created_at_utc: DateTime<Utc>,
    /// Persisted start timestamp, if any.
    pub started_at_utc: Option<DateTime<Utc>>,
    /// Persisted end timestamp, if any.
    pub ended_at_utc: Option<DateTime<Utc>>,
    /// Persisted summary.
    pub summary: String,
    /// Persisted runner output, if any.
    pub output_json: Option<Value>,
    /// Persisted failure classification, if any.
    pub failure_class: Option<String>,
    /// Persisted pull request URL, if any.
    pub pr_url: Option<String>,
    /// Persisted runtime reference, if any.
    pub runtime_id: Option<RuntimeId>,
    /// Persisted image provenance.
    pub image_provenance: ImageProvenance,
}

impl Run {
    /// Dispatches a new run for a task.
    ///
    /// The run starts `Queued` with the summary `"Queued"`.
    #[must_use]
    pub fn dispatch(task: &Task, project_id: ProjectId, attempt: u32, clock: &impl Clock) -> Self {
        Self {
            id: RunId::new(),
            task_id: task.id(),
            repository_id: task.repository_id(),
            project_id,
            state: RunState::Queued,
            attempt,
            created_at_utc: clock.utc(),
            started_at_utc: None,
            ended_at_utc: None,
            summary: "Queued".to_owned(),
            output_json: None,
            failure_class: None,
            pr_url: None,
            runtime_id: None,
            image_provenance: ImageProvenance::default(),
        }
    }

    /// Reconstructs a run from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRunData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            repository_id: data.repository_id,
            project_id: data.project_id,
            state: data.state,
            attempt: data.attempt,
            created_at_utc: data.created_at_utc,
            started_at_utc: data.started_at_utc,
            ended_at_utc: data.ended_at_utc,
            summary: data.summary,
            output_json: data.output_json,
            failure_class: data.failure_class,
            pr_url: data.pr_url,
            runtime_id: data.runtime_id,
            image_provenance: data.image_provenance,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn id(&self) -> RunId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning repository identifier.
    #[must_use]
    pub const fn repository_id(&self) -> RepositoryId {
        self.repository_id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Returns the attempt counter.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at_utc
    }

    /// Returns the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        self.started_at_utc
    }

    /// Returns the end timestamp, set exactly once on entering a terminal
    /// state.
    #[must_use]
    pub const fn ended_at_utc(&self) -> Option<DateTime<Utc>> {
        self.ended_at_utc
    }

    /// Returns the operator-facing summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the structured runner output, if any.
    #[must_use]
    pub const fn output_json(&self) -> Option<&Value> {
        self.output_json.as_ref()
    }

    /// Returns the advisory failure classification, if any.
    #[must_use]
    pub fn failure_class(&self) -> Option<&str> {
        self.failure_class.as_deref()
    }

    /// Returns the pull request URL, if any.
    #[must_use]
    pub fn pr_url(&self) -> Option<&str> {
        self.pr_url.as_deref()
    }

    /// Returns the executing runtime, if one has claimed the run.
    #[must_use]
    pub const fn runtime_id(&self) -> Option<&RuntimeId> {
        self.runtime_id.as_ref()
    }

    /// Returns the image provenance of the executing runtime.
    #[must_use]
    pub const fn image_provenance(&self) -> &ImageProvenance {
        &self.image_provenance
    }

    /// Returns the latest timestamp at which anything happened to the run.
    #[must_use]
    pub fn activity_at_utc(&self) -> DateTime<Utc> {
        self.ended_at_utc
            .or(self.started_at_utc)
            .map_or(self.created_at_utc, |later| later.max(self.created_at_utc))
    }

    /// Marks the run as picked up by a runtime.
    ///
    /// Repeated starts refresh the start timestamp and runtime fields; a
    /// worker re-claiming after a crash looks exactly like this.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// active.
    pub fn start(
        &mut self,
        runtime_id: RuntimeId,
        image_provenance: ImageProvenance,
        clock: &impl Clock,
    ) -> Result<(), RunDomainError> {
        self.guard(RunState::Running)?;
        self.state = RunState::Running;
        self.started_at_utc = Some(clock.utc());
        self.runtime_id = Some(runtime_id);
        self.image_provenance = image_provenance;
        Ok(())
    }

    /// Completes the run with the given outcome.
    ///
    /// Sets `ended_at_utc` exactly once; a blank summary is defaulted to
    /// the terminal state name.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// active.
    pub fn complete(
        &mut self,
        completion: RunCompletion,
        clock: &impl Clock,
    ) -> Result<(), RunDomainError> {
        let target = if completion.succeeded {
            RunState::Succeeded
        } else {
            RunState::Failed
        };
        self.guard(target)?;
        self.state = target;
        self.ended_at_utc = Some(clock.utc());
        self.summary = if completion.summary.trim().is_empty() {
            match target {
                RunState::Succeeded => "Succeeded".to_owned(),
                _ => "Failed".to_owned(),
            }
        } else {
            completion.summary
        };
        self.output_json = completion.output_json;
        self.failure_class = completion.failure_class;
        self.pr_url = completion.pr_url;
        Ok(())
    }

    /// Cancels an active run.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// active.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), RunDomainError> {
        self.guard(RunState::Cancelled)?;
        self.state = RunState::Cancelled;
        self.ended_at_utc = Some(clock.utc());
        self.summary = "Cancelled".to_owned();
        Ok(())
    }

    /// Marks a run obsolete because it was superseded.
    ///
    /// Permitted from active states and from `Succeeded`; an end timestamp
    /// already recorded is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] otherwise.
    pub fn mark_obsolete(&mut self, clock: &impl Clock) -> Result<(), RunDomainError> {
        if !(self.state.is_active() || self.state == RunState::Succeeded) {
            return Err(self.invalid_transition(RunState::Obsolete));
        }
        self.state = RunState::Obsolete;
        if self.ended_at_utc.is_none() {
            self.ended_at_utc = Some(clock.utc());
        }
        self.summary = "Obsolete".to_owned();
        Ok(())
    }

    /// Parks the run until an operator approves it.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// active.
    pub fn request_approval(&mut self) -> Result<(), RunDomainError> {
        self.guard(RunState::PendingApproval)?;
        self.state = RunState::PendingApproval;
        self.summary = "Pending approval".to_owned();
        Ok(())
    }

    /// Approves a parked run, returning it to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// pending approval.
    pub fn approve(&mut self) -> Result<(), RunDomainError> {
        if self.state != RunState::PendingApproval {
            return Err(self.invalid_transition(RunState::Queued));
        }
        self.state = RunState::Queued;
        self.summary = "Approved and queued".to_owned();
        Ok(())
    }

    /// Rejects a parked run, cancelling it.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::InvalidStateTransition`] unless the run is
    /// pending approval.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), RunDomainError> {
        if self.state != RunState::PendingApproval {
            return Err(self.invalid_transition(RunState::Cancelled));
        }
        self.state = RunState::Cancelled;
        self.ended_at_utc = Some(clock.utc());
        self.summary = "Rejected".to_owned();
        Ok(())
    }

    /// Checks the active-state precondition shared by most transitions.
    fn guard(&self, target: RunState) -> Result<(), RunDomainError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(self.invalid_transition(target))
        }
    }

    const fn invalid_transition(&self, to: RunState) -> RunDomainError {
        RunDomainError::InvalidStateTransition {
            run_id: self.id,
            from: self.state,
            to,
        }
    }
}
