//! Thread-safe in-memory finding repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::finding::{
    domain::{Finding, FindingId},
    ports::{FindingRepository, FindingRepositoryError, FindingRepositoryResult},
};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;

/// In-memory document-collection adapter for findings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFindingRepository {
    state: Arc<RwLock<HashMap<FindingId, Finding>>>,
}

impl InMemoryFindingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> FindingRepositoryError {
    FindingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FindingRepository for InMemoryFindingRepository {
    async fn store(&self, finding: &Finding) -> FindingRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&finding.id()) {
            return Err(FindingRepositoryError::DuplicateFinding(finding.id()));
        }
        state.insert(finding.id(), finding.clone());
        Ok(())
    }

    async fn update(&self, finding: &Finding) -> FindingRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&finding.id()) {
            return Err(FindingRepositoryError::NotFound(finding.id()));
        }
        state.insert(finding.id(), finding.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: FindingId) -> FindingRepositoryResult<Option<Finding>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_by_task(&self, task_id: TaskId) -> FindingRepositoryResult<Vec<Finding>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut findings: Vec<Finding> = state
            .values()
            .filter(|finding| finding.task_id() == task_id)
            .cloned()
            .collect();
        findings.sort_by_key(Finding::created_at_utc);
        Ok(findings)
    }

    async fn has_open_for_task(&self, task_id: TaskId) -> FindingRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .values()
            .any(|finding| finding.task_id() == task_id && finding.state().is_open()))
    }

    async fn delete_by_runs(&self, run_ids: &[RunId]) -> FindingRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.len();
        state.retain(|_, finding| !run_ids.contains(&finding.run_id()));
        Ok(before.saturating_sub(state.len()))
    }
}
