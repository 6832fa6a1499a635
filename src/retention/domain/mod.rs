//! Query, candidate, and result shapes for retention operations.

use crate::task::domain::{RepositoryId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filters for a cleanup-candidate scan.
///
/// Absent cutoffs fall back to the horizons in the stored system
/// settings; the scan limit bounds how many aged tasks are examined,
/// not how many are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupQuery {
    /// Tasks whose last activity predates this become candidates.
    pub retention_cutoff_utc: Option<DateTime<Utc>>,
    /// Disabled tasks idle since this become candidates.
    pub disabled_inactive_cutoff_utc: Option<DateTime<Utc>>,
    /// Only consider tasks with no active runs.
    pub only_with_no_active_runs: bool,
    /// Skip tasks referenced by a workflow stage.
    pub exclude_workflow_referenced: bool,
    /// Skip tasks with open findings.
    pub exclude_with_open_findings: bool,
    /// Cap on tasks examined; defaults from settings.
    pub scan_limit: Option<usize>,
    /// Cap on candidates returned.
    pub limit: usize,
}

/// Why a task qualified for cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupReason {
    /// Idle past the general retention horizon.
    RetentionExpired,
    /// Disabled and idle past the disabled-task horizon.
    DisabledInactive,
}

/// A task the retention engine proposes to delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupCandidate {
    /// Candidate task.
    pub task_id: TaskId,
    /// Owning repository.
    pub repository_id: RepositoryId,
    /// Task display name.
    pub name: String,
    /// Whether the task is still enabled.
    pub enabled: bool,
    /// Task creation time.
    pub created_at_utc: DateTime<Utc>,
    /// Latest observed activity across the task and its records.
    pub last_activity_utc: DateTime<Utc>,
    /// Runs currently in an active state.
    pub active_runs: usize,
    /// Total runs on record.
    pub total_runs: usize,
    /// Why the task qualified.
    pub reason: CleanupReason,
}

/// Per-collection outcome of a cascade deletion.
///
/// The database phase and the filesystem phase report through separate
/// channels: a workspace failure never aborts or masks the store-side
/// counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Whether the task record itself was removed by this call.
    pub task_deleted: bool,
    /// Removed run records.
    pub deleted_runs: usize,
    /// Removed run log entries.
    pub deleted_run_logs: usize,
    /// Removed structured events.
    pub deleted_structured_events: usize,
    /// Removed diff snapshots.
    pub deleted_diff_snapshots: usize,
    /// Removed tool projections.
    pub deleted_tool_projections: usize,
    /// Removed findings.
    pub deleted_findings: usize,
    /// Removed prompt entries.
    pub deleted_prompt_entries: usize,
    /// Removed AI summaries.
    pub deleted_ai_summaries: usize,
    /// Removed semantic chunks.
    pub deleted_semantic_chunks: usize,
    /// Whether a workspace directory was removed.
    pub workspace_removed: bool,
    /// Workspace removals that failed; best-effort, never thrown.
    pub workspace_failures: usize,
}

/// Exclusions applied while pruning structured run data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneOptions {
    /// Skip runs whose task a workflow stage references.
    pub exclude_workflow_referenced: bool,
    /// Skip runs whose task has open findings.
    pub exclude_with_open_findings: bool,
}

/// Outcome of a structured-data pruning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneResult {
    /// Terminal runs examined by the scan.
    pub scanned_runs: usize,
    /// Runs whose structured data was reclaimed.
    pub pruned_runs: usize,
    /// Removed structured events.
    pub deleted_structured_events: usize,
    /// Removed diff snapshots.
    pub deleted_diff_snapshots: usize,
    /// Removed tool projections.
    pub deleted_tool_projections: usize,
    /// Runs skipped because of a workflow reference.
    pub skipped_workflow_referenced: usize,
    /// Runs skipped because of open findings.
    pub skipped_open_findings: usize,
}
