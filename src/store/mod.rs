//! Typed repository session over the document store.
//!
//! The store itself is an external collaborator; what the control plane
//! owns is one typed repository interface per collection, composed here
//! into a unit-of-work struct. Services borrow exactly the handles they
//! need, and multi-collection operations (cascade deletion, retention)
//! take the whole session.

use std::sync::Arc;

use crate::event::adapters::memory::{
    InMemoryStructuredEventRepository, InMemoryToolProjectionRepository,
};
use crate::event::ports::{StructuredEventRepository, ToolProjectionRepository};
use crate::finding::adapters::memory::InMemoryFindingRepository;
use crate::finding::ports::FindingRepository;
use crate::history::adapters::memory::{
    InMemoryAiSummaryRepository, InMemoryPromptEntryRepository,
};
use crate::history::ports::{AiSummaryRepository, PromptEntryRepository};
use crate::run::adapters::memory::{
    InMemoryDiffSnapshotRepository, InMemoryRunLogRepository, InMemoryRunRepository,
};
use crate::run::ports::{DiffSnapshotRepository, RunLogRepository, RunRepository};
use crate::runtime::adapters::memory::InMemoryRuntimeRepository;
use crate::runtime::ports::RuntimeRepository;
use crate::search::adapters::memory::InMemorySemanticChunkRepository;
use crate::search::ports::SemanticChunkRepository;
use crate::settings::adapters::memory::InMemorySettingsRepository;
use crate::settings::ports::SettingsRepository;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::ports::TaskRepository;
use crate::workflow::adapters::memory::InMemoryWorkflowStageRepository;
use crate::workflow::ports::WorkflowStageRepository;

/// One typed handle per collection of the document store.
#[derive(Clone)]
pub struct StoreSession {
    /// Task definitions.
    pub tasks: Arc<dyn TaskRepository>,
    /// Run records.
    pub runs: Arc<dyn RunRepository>,
    /// Run log entries.
    pub run_logs: Arc<dyn RunLogRepository>,
    /// Diff snapshots.
    pub diff_snapshots: Arc<dyn DiffSnapshotRepository>,
    /// Structured run events.
    pub structured_events: Arc<dyn StructuredEventRepository>,
    /// Derived tool projections.
    pub tool_projections: Arc<dyn ToolProjectionRepository>,
    /// Findings raised from failed runs.
    pub findings: Arc<dyn FindingRepository>,
    /// Prompt history entries.
    pub prompt_entries: Arc<dyn PromptEntryRepository>,
    /// AI-generated summaries.
    pub ai_summaries: Arc<dyn AiSummaryRepository>,
    /// Semantic search chunks.
    pub semantic_chunks: Arc<dyn SemanticChunkRepository>,
    /// Workflow stages referencing tasks.
    pub workflow_stages: Arc<dyn WorkflowStageRepository>,
    /// Tracked task runtimes.
    pub task_runtimes: Arc<dyn RuntimeRepository>,
    /// The settings document.
    pub settings: Arc<dyn SettingsRepository>,
}

impl StoreSession {
    /// Builds a session backed entirely by in-memory collections.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            runs: Arc::new(InMemoryRunRepository::new()),
            run_logs: Arc::new(InMemoryRunLogRepository::new()),
            diff_snapshots: Arc::new(InMemoryDiffSnapshotRepository::new()),
            structured_events: Arc::new(InMemoryStructuredEventRepository::new()),
            tool_projections: Arc::new(InMemoryToolProjectionRepository::new()),
            findings: Arc::new(InMemoryFindingRepository::new()),
            prompt_entries: Arc::new(InMemoryPromptEntryRepository::new()),
            ai_summaries: Arc::new(InMemoryAiSummaryRepository::new()),
            semantic_chunks: Arc::new(InMemorySemanticChunkRepository::new()),
            workflow_stages: Arc::new(InMemoryWorkflowStageRepository::new()),
            task_runtimes: Arc::new(InMemoryRuntimeRepository::new()),
            settings: Arc::new(InMemorySettingsRepository::new()),
        }
    }
}
