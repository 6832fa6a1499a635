//! Service layer for structured event ingestion and tool projection.

use crate::event::{
    domain::{
        StructuredEvent, StructuredEventDraft, ToolCallDerivation, ToolCallObservation,
        ToolProjection, derive_tool_call,
    },
    ports::{EventRepositoryError, StructuredEventRepository, ToolProjectionRepository},
};
use crate::run::domain::RunId;
use crate::run::ports::{RunRepository, RunRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for event pipeline operations.
#[derive(Debug, Error)]
pub enum EventPipelineError {
    /// Event repository operation failed.
    #[error(transparent)]
    Events(#[from] EventRepositoryError),
    /// Run lookup failed while backfilling references.
    #[error(transparent)]
    Runs(#[from] RunRepositoryError),
}

/// Result type for event pipeline service operations.
pub type EventPipelineResult<T> = Result<T, EventPipelineError>;

/// Structured event ingestion and tool-projection service.
#[derive(Clone)]
pub struct EventPipelineService<C>
where
    C: Clock + Send + Sync,
{
    events: Arc<dyn StructuredEventRepository>,
    projections: Arc<dyn ToolProjectionRepository>,
    runs: Arc<dyn RunRepository>,
    clock: Arc<C>,
}

impl<C> EventPipelineService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new event pipeline service.
    #[must_use]
    pub const fn new(
        events: Arc<dyn StructuredEventRepository>,
        projections: Arc<dyn ToolProjectionRepository>,
        runs: Arc<dyn RunRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            events,
            projections,
            runs,
            clock,
        }
    }

    /// Ingests a structured event and refreshes tool projections.
    ///
    /// The event is normalised, backfilled from its parent run, and
    /// upserted by `(run_id, sequence)` — re-ingesting a sequence updates
    /// in place. Projection derivation is best-effort: a malformed JSON
    /// payload skips only that step.
    ///
    /// # Errors
    ///
    /// Returns [`EventPipelineError`] when persistence fails.
    pub async fn append_structured_event(
        &self,
        draft: StructuredEventDraft,
    ) -> EventPipelineResult<StructuredEvent> {
        let mut event = StructuredEvent::normalize(draft, &*self.clock);

        if event.repository_id().is_none() || event.task_id().is_none() {
            match self.runs.find_by_id(event.run_id()).await? {
                Some(run) => event.backfill_origin(run.repository_id(), run.task_id()),
                None => {
                    debug!(run_id = %event.run_id(), "event references unknown run");
                }
            }
        }

        self.events.upsert(&event).await?;

        match derive_tool_call(&event) {
            ToolCallDerivation::Observed(observation) => {
                self.project(observation).await?;
            }
            ToolCallDerivation::MalformedPayload => {
                warn!(
                    run_id = %event.run_id(),
                    sequence = event.sequence(),
                    "tool projection skipped: malformed payload"
                );
            }
            ToolCallDerivation::NotToolRelated => {}
        }

        Ok(event)
    }

    /// Returns all stored events of a run ordered by sequence.
    ///
    /// # Errors
    ///
    /// Returns [`EventPipelineError::Events`] when the listing fails.
    pub async fn list_run_events(
        &self,
        run_id: RunId,
    ) -> EventPipelineResult<Vec<StructuredEvent>> {
        Ok(self.events.list_by_run(run_id).await?)
    }

    /// Returns all tool projections of a run ordered by sequence range.
    ///
    /// # Errors
    ///
    /// Returns [`EventPipelineError::Events`] when the listing fails.
    pub async fn list_run_tool_projections(
        &self,
        run_id: RunId,
    ) -> EventPipelineResult<Vec<ToolProjection>> {
        Ok(self.projections.list_by_run(run_id).await?)
    }

    /// Merges an observation into its projection, creating one if needed.
    ///
    /// An explicit tool-call identity wins over sequence adjacency.
    async fn project(&self, observation: ToolCallObservation) -> EventPipelineResult<()> {
        let mut existing = self.projections.list_by_run(observation.run_id).await?;
        let matched = observation
            .tool_call_id
            .as_deref()
            .and_then(|id| {
                existing
                    .iter()
                    .position(|projection| projection.tool_call_id() == Some(id))
            })
            .or_else(|| {
                existing
                    .iter()
                    .position(|projection| projection.matches(&observation))
            });

        let projection = match matched {
            Some(index) => {
                let mut found = existing.swap_remove(index);
                found.absorb(observation, &*self.clock);
                found
            }
            None => ToolProjection::from_observation(observation, &*self.clock),
        };
        self.projections.upsert(&projection).await?;
        Ok(())
    }
}
