//! Service layer for the run lifecycle state machine.
//!
//! Every transition reads current state, checks the precondition, and
//! writes; no lock is held across store calls. A transition whose
//! precondition no longer holds returns `Ok(None)` — the expected outcome
//! of benign races between workers and operators, never logged as an
//! error here.

use crate::finding::{
    domain::{Finding, FindingSeverity},
    ports::{FindingRepository, FindingRepositoryError},
};
use crate::run::{
    domain::{ImageProvenance, Run, RunCompletion, RunDomainError, RunId},
    ports::{RunRepository, RunRepositoryError},
};
use crate::runtime::domain::RuntimeId;
use crate::task::domain::{ProjectId, Task};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for run lifecycle operations.
///
/// Precondition mismatches are not errors; they surface as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RunLifecycleError {
    /// Run repository operation failed.
    #[error(transparent)]
    Repository(#[from] RunRepositoryError),
    /// Finding repository operation failed while recording a failure.
    #[error(transparent)]
    Finding(#[from] FindingRepositoryError),
}

/// Result type for run lifecycle service operations.
pub type RunLifecycleResult<T> = Result<T, RunLifecycleError>;

/// Run lifecycle orchestration service.
#[derive(Clone)]
pub struct RunLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    runs: Arc<dyn RunRepository>,
    findings: Arc<dyn FindingRepository>,
    clock: Arc<C>,
}

impl<C> RunLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new run lifecycle service.
    #[must_use]
    pub const fn new(
        runs: Arc<dyn RunRepository>,
        findings: Arc<dyn FindingRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            runs,
            findings,
            clock,
        }
    }

    /// Dispatches a new `Queued` run for a resolved task.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn create_run(
        &self,
        task: &Task,
        project_id: ProjectId,
        attempt: u32,
    ) -> RunLifecycleResult<Run> {
        let run = Run::dispatch(task, project_id, attempt, &*self.clock);
        self.runs.store(&run).await?;
        debug!(run_id = %run.id(), task_id = %task.id(), attempt, "run dispatched");
        Ok(run)
    }

    /// Finds a run by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_run(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        Ok(self.runs.find_by_id(run_id).await?)
    }

    /// Marks a run as picked up by a runtime.
    ///
    /// Returns `Ok(None)` when the run is missing or no longer active.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn start_run(
        &self,
        run_id: RunId,
        runtime_id: RuntimeId,
        image_provenance: ImageProvenance,
    ) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, move |run, clock| {
            run.start(runtime_id, image_provenance, clock)
        })
        .await
    }

    /// Completes a run with the given outcome.
    ///
    /// A failed completion additionally raises a `New` finding; failure
    /// classification stays advisory on the run itself.
    ///
    /// Returns `Ok(None)` when the run is missing or already terminal.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError`] when persistence fails.
    pub async fn complete_run(
        &self,
        run_id: RunId,
        completion: RunCompletion,
    ) -> RunLifecycleResult<Option<Run>> {
        let succeeded = completion.succeeded;
        let completed = self
            .transition(run_id, move |run, clock| run.complete(completion, clock))
            .await?;
        if let Some(run) = completed.as_ref().filter(|_| !succeeded) {
            self.raise_failure_finding(run).await?;
        }
        Ok(completed)
    }

    /// Cancels an active run.
    ///
    /// Returns `Ok(None)` when the run is missing or not active.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn cancel_run(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, |run, clock| run.cancel(clock)).await
    }

    /// Marks a run obsolete.
    ///
    /// Returns `Ok(None)` when the run is missing or neither active nor
    /// `Succeeded`.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn mark_run_obsolete(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, |run, clock| run.mark_obsolete(clock))
            .await
    }

    /// Parks a run pending operator approval.
    ///
    /// Returns `Ok(None)` when the run is missing or not active.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn request_approval(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, |run, _clock| run.request_approval())
            .await
    }

    /// Approves a parked run, returning it to the queue.
    ///
    /// Returns `Ok(None)` when the run is missing or not pending approval.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn approve_run(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, |run, _clock| run.approve()).await
    }

    /// Rejects a parked run, cancelling it.
    ///
    /// Returns `Ok(None)` when the run is missing or not pending approval.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn reject_run(&self, run_id: RunId) -> RunLifecycleResult<Option<Run>> {
        self.transition(run_id, |run, clock| run.reject(clock)).await
    }

    /// Cancels every listed run that is still active.
    ///
    /// Returns the number of runs actually cancelled; ids that are missing
    /// or already settled are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns [`RunLifecycleError::Repository`] when persistence fails.
    pub async fn bulk_cancel_runs(&self, run_ids: &[RunId]) -> RunLifecycleResult<usize> {
        let mut cancelled = 0;
        for run_id in run_ids {
            if self.cancel_run(*run_id).await?.is_some() {
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }

    /// Shared read-check-write cycle for a single transition.
    async fn transition<F>(&self, run_id: RunId, apply: F) -> RunLifecycleResult<Option<Run>>
    where
        F: FnOnce(&mut Run, &C) -> Result<(), RunDomainError>,
    {
        let Some(mut run) = self.runs.find_by_id(run_id).await? else {
            return Ok(None);
        };
        let from = run.state();
        if let Err(RunDomainError::InvalidStateTransition { to, .. }) =
            apply(&mut run, &*self.clock)
        {
            debug!(%run_id, %from, %to, "transition precondition did not hold");
            return Ok(None);
        }
        match self.runs.update(&run).await {
            Ok(()) => {
                debug!(%run_id, %from, to = %run.state(), "run transitioned");
                Ok(Some(run))
            }
            // The run vanished between read and write; a concurrent cascade
            // delete won the race.
            Err(RunRepositoryError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Records a `New` finding for a failed run.
    async fn raise_failure_finding(&self, run: &Run) -> RunLifecycleResult<()> {
        let severity = if run.failure_class().is_some() {
            FindingSeverity::High
        } else {
            FindingSeverity::Medium
        };
        let title = if run.summary().trim().is_empty() {
            "Run failed"
        } else {
            run.summary()
        };
        match Finding::raise(
            run.id(),
            run.task_id(),
            run.repository_id(),
            title,
            severity,
            &*self.clock,
        ) {
            Ok(finding) => {
                self.findings.store(&finding).await?;
                Ok(())
            }
            Err(err) => {
                warn!(run_id = %run.id(), %err, "failure finding skipped");
                Ok(())
            }
        }
    }
}
