//! Thread-safe in-memory adapters for prompt entries and AI summaries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::history::{
    domain::{AiSummary, PromptEntry},
    ports::{
        AiSummaryRepository, HistoryRepositoryError, HistoryRepositoryResult,
        PromptEntryRepository,
    },
};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;

fn lock_poisoned(err: impl std::fmt::Display) -> HistoryRepositoryError {
    HistoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn belongs_to(task_id: TaskId, run_ids: &[RunId], entry_task: TaskId, entry_run: Option<RunId>) -> bool {
    entry_task == task_id || entry_run.is_some_and(|run_id| run_ids.contains(&run_id))
}

/// In-memory document-collection adapter for prompt entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromptEntryRepository {
    state: Arc<RwLock<Vec<PromptEntry>>>,
}

impl InMemoryPromptEntryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptEntryRepository for InMemoryPromptEntryRepository {
    async fn append(&self, entry: &PromptEntry) -> HistoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.push(entry.clone());
        Ok(())
    }

    async fn list_by_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<PromptEntry>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut entries: Vec<PromptEntry> = state
            .iter()
            .filter(|entry| entry.task_id == task_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.created_at_utc);
        Ok(entries)
    }

    async fn latest_timestamp_for_task(
        &self,
        task_id: TaskId,
    ) -> HistoryRepositoryResult<Option<DateTime<Utc>>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .iter()
            .filter(|entry| entry.task_id == task_id)
            .map(|entry| entry.created_at_utc)
            .max())
    }

    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> HistoryRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|entry| !belongs_to(task_id, run_ids, entry.task_id, entry.run_id));
        Ok(before.saturating_sub(state.len()))
    }
}

/// In-memory document-collection adapter for AI summaries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAiSummaryRepository {
    state: Arc<RwLock<Vec<AiSummary>>>,
}

impl InMemoryAiSummaryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AiSummaryRepository for InMemoryAiSummaryRepository {
    async fn append(&self, summary: &AiSummary) -> HistoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.push(summary.clone());
        Ok(())
    }

    async fn list_by_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<AiSummary>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut summaries: Vec<AiSummary> = state
            .iter()
            .filter(|summary| summary.task_id == task_id)
            .cloned()
            .collect();
        summaries.sort_by_key(|summary| summary.created_at_utc);
        Ok(summaries)
    }

    async fn latest_timestamp_for_task(
        &self,
        task_id: TaskId,
    ) -> HistoryRepositoryResult<Option<DateTime<Utc>>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .iter()
            .filter(|summary| summary.task_id == task_id)
            .map(|summary| summary.created_at_utc)
            .max())
    }

    async fn delete_for_task_or_runs(
        &self,
        task_id: TaskId,
        run_ids: &[RunId],
    ) -> HistoryRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|summary| !belongs_to(task_id, run_ids, summary.task_id, summary.run_id));
        Ok(before.saturating_sub(state.len()))
    }
}
