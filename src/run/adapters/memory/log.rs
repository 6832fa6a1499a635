//! Thread-safe in-memory adapters for run logs and diff snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::run::{
    domain::{DiffSnapshot, RunId, RunLogEntry},
    ports::{
        DiffSnapshotRepository, RunLogRepository, RunRepositoryError, RunRepositoryResult,
    },
};

fn lock_poisoned(err: impl std::fmt::Display) -> RunRepositoryError {
    RunRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// In-memory document-collection adapter for run log entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRunLogRepository {
    state: Arc<RwLock<Vec<RunLogEntry>>>,
}

impl InMemoryRunLogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunLogRepository for InMemoryRunLogRepository {
    async fn append(&self, entry: &RunLogEntry) -> RunRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.push(entry.clone());
        Ok(())
    }

    async fn list_by_run(&self, run_id: RunId) -> RunRepositoryResult<Vec<RunLogEntry>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut entries: Vec<RunLogEntry> = state
            .iter()
            .filter(|entry| entry.run_id == run_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.timestamp_utc);
        Ok(entries)
    }

    async fn latest_timestamp_for_runs(
        &self,
        run_ids: &[RunId],
    ) -> RunRepositoryResult<Option<DateTime<Utc>>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .iter()
            .filter(|entry| run_ids.contains(&entry.run_id))
            .map(|entry| entry.timestamp_utc)
            .max())
    }

    async fn delete_by_runs(&self, run_ids: &[RunId]) -> RunRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|entry| !run_ids.contains(&entry.run_id));
        Ok(before.saturating_sub(state.len()))
    }
}

/// In-memory document-collection adapter for diff snapshots.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiffSnapshotRepository {
    state: Arc<RwLock<Vec<DiffSnapshot>>>,
}

impl InMemoryDiffSnapshotRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiffSnapshotRepository for InMemoryDiffSnapshotRepository {
    async fn append(&self, snapshot: &DiffSnapshot) -> RunRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.push(snapshot.clone());
        Ok(())
    }

    async fn list_by_run(&self, run_id: RunId) -> RunRepositoryResult<Vec<DiffSnapshot>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut snapshots: Vec<DiffSnapshot> = state
            .iter()
            .filter(|snapshot| snapshot.run_id == run_id)
            .cloned()
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.created_at_utc);
        Ok(snapshots)
    }

    async fn delete_by_runs(&self, run_ids: &[RunId]) -> RunRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|snapshot| !run_ids.contains(&snapshot.run_id));
        Ok(before.saturating_sub(state.len()))
    }
}
