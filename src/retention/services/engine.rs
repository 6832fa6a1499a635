//! Service layer for cleanup scans, cascade deletion, and pruning.

use crate::event::ports::{
    EventRepositoryError, StructuredEventRepository, ToolProjectionRepository,
};
use crate::finding::ports::{FindingRepository, FindingRepositoryError};
use crate::history::ports::{
    AiSummaryRepository, HistoryRepositoryError, PromptEntryRepository,
};
use crate::retention::{
    domain::{
        CascadeResult, CleanupCandidate, CleanupQuery, CleanupReason, PruneOptions, PruneResult,
    },
    ports::WorkspaceStore,
};
use crate::run::domain::{Run, RunId};
use crate::run::ports::{DiffSnapshotRepository, RunLogRepository, RunRepository};
use crate::search::ports::{SemanticChunkRepository, SemanticChunkRepositoryError};
use crate::settings::services::{SettingsService, SettingsServiceError};
use crate::store::StoreSession;
use crate::task::domain::{Task, TaskId};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::workflow::ports::{WorkflowStageRepository, WorkflowStageRepositoryError};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for retention operations.
///
/// Workspace failures never appear here: they surface as counters in the
/// cascade result.
#[derive(Debug, Error)]
pub enum RetentionError {
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Run repository operation failed.
    #[error(transparent)]
    Runs(#[from] crate::run::ports::RunRepositoryError),
    /// Event repository operation failed.
    #[error(transparent)]
    Events(#[from] EventRepositoryError),
    /// Finding repository operation failed.
    #[error(transparent)]
    Findings(#[from] FindingRepositoryError),
    /// History repository operation failed.
    #[error(transparent)]
    History(#[from] HistoryRepositoryError),
    /// Chunk repository operation failed.
    #[error(transparent)]
    Chunks(#[from] SemanticChunkRepositoryError),
    /// Workflow stage lookup failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowStageRepositoryError),
    /// Settings lookup failed.
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
}

/// Result type for retention service operations.
pub type RetentionResult<T> = Result<T, RetentionError>;

/// Cascade and retention orchestration service.
#[derive(Clone)]
pub struct RetentionEngineService<C>
where
    C: Clock + Send + Sync,
{
    session: StoreSession,
    settings: SettingsService,
    workspace: Arc<dyn WorkspaceStore>,
    clock: Arc<C>,
}

impl<C> RetentionEngineService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new retention engine over a store session.
    #[must_use]
    pub fn new(session: StoreSession, workspace: Arc<dyn WorkspaceStore>, clock: Arc<C>) -> Self {
        let settings = SettingsService::new(session.settings.clone());
        Self {
            session,
            settings,
            workspace,
            clock,
        }
    }

    /// Scans for tasks that qualify for cleanup.
    ///
    /// Candidates are sorted oldest activity first, then by creation
    /// time, and truncated to the query limit. The scan itself examines
    /// at most `scan_limit` aged tasks.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError`] when any store read fails.
    pub async fn list_cleanup_candidates(
        &self,
        query: CleanupQuery,
    ) -> RetentionResult<Vec<CleanupCandidate>> {
        let now = self.clock.utc();
        let settings = self.settings.current().await?;
        let retention_cutoff = query
            .retention_cutoff_utc
            .unwrap_or_else(|| now - Duration::days(i64::from(settings.retention_days)));
        let disabled_cutoff = query.disabled_inactive_cutoff_utc.unwrap_or_else(|| {
            now - Duration::days(i64::from(settings.disabled_retention_days))
        });
        let scan_limit = query.scan_limit.unwrap_or(settings.cleanup_scan_limit);
        let scan_cutoff = retention_cutoff.max(disabled_cutoff);

        let aged = self
            .session
            .tasks
            .list_created_before(scan_cutoff, scan_limit)
            .await?;

        let mut candidates = Vec::new();
        for task in aged {
            if let Some(candidate) = self
                .qualify(&task, &query, retention_cutoff, disabled_cutoff)
                .await?
            {
                candidates.push(candidate);
            }
        }
        candidates.sort_by_key(|candidate| (candidate.last_activity_utc, candidate.created_at_utc));
        candidates.truncate(query.limit);
        Ok(candidates)
    }

    /// Deletes a task together with everything that describes it.
    ///
    /// Collection deletes are issued children-first so an interruption
    /// can orphan child rows but never leave a task with unreachable
    /// runs. Workspace removal runs last, in its own error channel.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError`] when a store-side delete fails.
    pub async fn delete_task_cascade(
        &self,
        task_id: TaskId,
    ) -> RetentionResult<CascadeResult> {
        let mut result = CascadeResult::default();
        if self.session.tasks.find_by_id(task_id).await?.is_none() {
            return Ok(result);
        }

        let runs = self.session.runs.list_by_task(task_id).await?;
        let run_ids: Vec<RunId> = runs.iter().map(Run::id).collect();

        result.deleted_run_logs = self.session.run_logs.delete_by_runs(&run_ids).await?;
        result.deleted_structured_events = self
            .session
            .structured_events
            .delete_by_runs(&run_ids)
            .await?;
        result.deleted_diff_snapshots = self
            .session
            .diff_snapshots
            .delete_by_runs(&run_ids)
            .await?;
        result.deleted_tool_projections = self
            .session
            .tool_projections
            .delete_by_runs(&run_ids)
            .await?;
        result.deleted_findings = self.session.findings.delete_by_runs(&run_ids).await?;
        result.deleted_prompt_entries = self
            .session
            .prompt_entries
            .delete_for_task_or_runs(task_id, &run_ids)
            .await?;
        result.deleted_ai_summaries = self
            .session
            .ai_summaries
            .delete_for_task_or_runs(task_id, &run_ids)
            .await?;
        result.deleted_semantic_chunks = self
            .session
            .semantic_chunks
            .delete_for_task_or_runs(task_id, &run_ids)
            .await?;
        result.deleted_runs = self.session.runs.delete_by_task(task_id).await?;
        result.task_deleted = self.session.tasks.delete(task_id).await?;

        match self.workspace.remove_workspace(task_id).await {
            Ok(removed) => result.workspace_removed = removed,
            Err(err) => {
                warn!(%task_id, %err, "workspace removal failed");
                result.workspace_failures += 1;
            }
        }

        debug!(
            %task_id,
            runs = result.deleted_runs,
            events = result.deleted_structured_events,
            "task cascade completed"
        );
        Ok(result)
    }

    /// Reclaims structured data from old terminal runs.
    ///
    /// Scans terminal runs ended before the cutoff, oldest first, and
    /// deletes their structured events, diff snapshots, and tool
    /// projections — never the runs themselves — for up to `max_runs`
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError`] when a store operation fails.
    pub async fn prune_structured_run_data(
        &self,
        older_than_utc: DateTime<Utc>,
        max_runs: usize,
        options: PruneOptions,
    ) -> RetentionResult<PruneResult> {
        let settings = self.settings.current().await?;
        let aged = self
            .session
            .runs
            .list_terminal_ended_before(older_than_utc, settings.prune_scan_limit)
            .await?;

        let mut result = PruneResult {
            scanned_runs: aged.len(),
            ..PruneResult::default()
        };

        for run in aged {
            if result.pruned_runs >= max_runs {
                break;
            }
            if options.exclude_workflow_referenced
                && self
                    .session
                    .workflow_stages
                    .references_task(run.task_id())
                    .await?
            {
                result.skipped_workflow_referenced += 1;
                continue;
            }
            if options.exclude_with_open_findings
                && self.session.findings.has_open_for_task(run.task_id()).await?
            {
                result.skipped_open_findings += 1;
                continue;
            }

            let run_ids = [run.id()];
            result.deleted_structured_events += self
                .session
                .structured_events
                .delete_by_runs(&run_ids)
                .await?;
            result.deleted_diff_snapshots += self
                .session
                .diff_snapshots
                .delete_by_runs(&run_ids)
                .await?;
            result.deleted_tool_projections += self
                .session
                .tool_projections
                .delete_by_runs(&run_ids)
                .await?;
            result.pruned_runs += 1;
        }

        Ok(result)
    }

    /// Evaluates one aged task against the query filters.
    async fn qualify(
        &self,
        task: &Task,
        query: &CleanupQuery,
        retention_cutoff: DateTime<Utc>,
        disabled_cutoff: DateTime<Utc>,
    ) -> RetentionResult<Option<CleanupCandidate>> {
        let runs = self.session.runs.list_by_task(task.id()).await?;
        let active_runs = runs.iter().filter(|run| run.state().is_active()).count();
        if query.only_with_no_active_runs && active_runs > 0 {
            return Ok(None);
        }

        let last_activity = self.last_activity(task, &runs).await?;
        let reason = if last_activity < retention_cutoff {
            CleanupReason::RetentionExpired
        } else if !task.enabled() && last_activity < disabled_cutoff {
            CleanupReason::DisabledInactive
        } else {
            return Ok(None);
        };

        if query.exclude_workflow_referenced
            && self
                .session
                .workflow_stages
                .references_task(task.id())
                .await?
        {
            return Ok(None);
        }
        if query.exclude_with_open_findings
            && self.session.findings.has_open_for_task(task.id()).await?
        {
            return Ok(None);
        }

        Ok(Some(CleanupCandidate {
            task_id: task.id(),
            repository_id: task.repository_id(),
            name: task.name().as_str().to_owned(),
            enabled: task.enabled(),
            created_at_utc: task.created_at_utc(),
            last_activity_utc: last_activity,
            active_runs,
            total_runs: runs.len(),
            reason,
        }))
    }

    /// Latest activity across the task and everything recorded about it.
    async fn last_activity(&self, task: &Task, runs: &[Run]) -> RetentionResult<DateTime<Utc>> {
        let run_ids: Vec<RunId> = runs.iter().map(Run::id).collect();
        let run_activity = runs.iter().map(Run::activity_at_utc).max();
        let log_activity = self
            .session
            .run_logs
            .latest_timestamp_for_runs(&run_ids)
            .await?;
        let prompt_activity = self
            .session
            .prompt_entries
            .latest_timestamp_for_task(task.id())
            .await?;
        let summary_activity = self
            .session
            .ai_summaries
            .latest_timestamp_for_task(task.id())
            .await?;

        Ok([run_activity, log_activity, prompt_activity, summary_activity]
            .into_iter()
            .flatten()
            .fold(task.created_at_utc(), Ord::max))
    }
}
