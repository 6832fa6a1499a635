//! Cascade deletion through a fully-populated session.

use std::sync::Arc;

use brunel::event::domain::StructuredEventDraft;
use brunel::event::services::EventPipelineService;
use brunel::retention::adapters::memory::InMemoryWorkspaceStore;
use brunel::retention::services::RetentionEngineService;
use brunel::run::domain::RunCompletion;
use brunel::run::ports::RunRepository;
use brunel::run::services::RunLifecycleService;
use brunel::search::domain::ChunkDraft;
use brunel::search::ports::SemanticChunkRepository;
use brunel::search::services::SemanticSearchService;
use brunel::store::StoreSession;
use brunel::task::domain::TaskKind;

use super::helpers::{FixedClock, stored_task};

#[tokio::test(flavor = "multi_thread")]
async fn cascade_clears_every_collection_a_task_touched() {
    let clock = FixedClock::at(2024, 9, 1, 0, 0, 0);
    let session = StoreSession::in_memory();
    let workspace = Arc::new(InMemoryWorkspaceStore::new());
    let lifecycle = RunLifecycleService::new(
        session.runs.clone(),
        session.findings.clone(),
        Arc::new(clock),
    );
    let pipeline = EventPipelineService::new(
        session.structured_events.clone(),
        session.tool_projections.clone(),
        session.runs.clone(),
        Arc::new(clock),
    );
    let search = SemanticSearchService::new(
        session.semantic_chunks.clone(),
        session.tasks.clone(),
        Arc::new(clock),
    );
    let engine =
        RetentionEngineService::new(session.clone(), workspace.clone(), Arc::new(clock));

    let task = stored_task(&session, "Everything", TaskKind::OneShot, None, &clock).await;
    workspace
        .create_workspace(task.id())
        .expect("workspace creation should succeed");

    // A failed run: events, a tool projection, a finding, and chunks.
    let run = lifecycle
        .create_run(&task, task.project_id(), 1)
        .await
        .expect("run creation should succeed");
    pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1)
                .with_event_type("tool_call")
                .with_payload(r#"{"toolCallId": "c-1"}"#),
        )
        .await
        .expect("ingestion should succeed");
    lifecycle
        .complete_run(run.id(), RunCompletion::new(false, "exploded"))
        .await
        .expect("completion should succeed")
        .expect("run should be completable");
    search
        .upsert_chunks(
            task.id(),
            vec![ChunkDraft::new("notes.md", 0, "chunked content")],
        )
        .await
        .expect("chunk upsert should succeed");

    let result = engine
        .delete_task_cascade(task.id())
        .await
        .expect("cascade should succeed");

    assert!(result.task_deleted);
    assert_eq!(result.deleted_runs, 1);
    assert_eq!(result.deleted_structured_events, 1);
    assert_eq!(result.deleted_tool_projections, 1);
    assert_eq!(result.deleted_findings, 1);
    assert_eq!(result.deleted_semantic_chunks, 1);
    assert!(result.workspace_removed);

    // Nothing is left behind in any collection.
    assert!(
        session
            .runs
            .list_by_task(task.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        session
            .semantic_chunks
            .list_by_task(task.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}
