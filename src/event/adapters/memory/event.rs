//! Thread-safe in-memory structured event repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::event::{
    domain::StructuredEvent,
    ports::{EventRepositoryError, EventRepositoryResult, StructuredEventRepository},
};
use crate::run::domain::RunId;

/// In-memory document-collection adapter for structured events, keyed by
/// `(run_id, sequence)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStructuredEventRepository {
    state: Arc<RwLock<HashMap<(RunId, u64), StructuredEvent>>>,
}

impl InMemoryStructuredEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> EventRepositoryError {
    EventRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl StructuredEventRepository for InMemoryStructuredEventRepository {
    async fn upsert(&self, event: &StructuredEvent) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.insert((event.run_id(), event.sequence()), event.clone());
        Ok(())
    }

    async fn list_by_run(&self, run_id: RunId) -> EventRepositoryResult<Vec<StructuredEvent>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut events: Vec<StructuredEvent> = state
            .values()
            .filter(|event| event.run_id() == run_id)
            .cloned()
            .collect();
        events.sort_by_key(StructuredEvent::sequence);
        Ok(events)
    }

    async fn delete_by_runs(&self, run_ids: &[RunId]) -> EventRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|(run_id, _), _| !run_ids.contains(run_id));
        Ok(before.saturating_sub(state.len()))
    }
}
