//! Structured events and projections over real dispatched runs.

use std::sync::Arc;

use brunel::event::domain::StructuredEventDraft;
use brunel::event::services::EventPipelineService;
use brunel::run::services::RunLifecycleService;
use brunel::store::StoreSession;
use brunel::task::domain::TaskKind;

use super::helpers::{FixedClock, stored_task};

#[tokio::test(flavor = "multi_thread")]
async fn a_run_accumulates_events_and_projections() {
    let clock = FixedClock::at(2024, 5, 10, 9, 0, 0);
    let session = StoreSession::in_memory();
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

    let task = stored_task(&session, "Instrumented", TaskKind::OneShot, None, &clock).await;
    let run = lifecycle
        .create_run(&task, task.project_id(), 1)
        .await
        .expect("run creation should succeed");

    pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1)
                .with_event_type("log")
                .with_summary("cloning repository"),
        )
        .await
        .expect("log ingestion should succeed");
    pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 2)
                .with_event_type("tool_call")
                .with_payload(r#"{"toolCallId": "c-1", "toolName": "apply_patch"}"#),
        )
        .await
        .expect("call ingestion should succeed");
    pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 3)
                .with_event_type("tool_result")
                .with_payload(r#"{"toolCallId": "c-1", "status": "ok"}"#),
        )
        .await
        .expect("result ingestion should succeed");

    let events = pipeline
        .list_run_events(run.id())
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 3);
    // Every event inherited its origin from the run.
    assert!(events.iter().all(|event| {
        event.task_id() == Some(task.id()) && event.repository_id() == Some(task.repository_id())
    }));

    let projections = pipeline
        .list_run_tool_projections(run.id())
        .await
        .expect("projection listing should succeed");
    assert_eq!(projections.len(), 1);
    let projection = projections.first().expect("one projection");
    assert_eq!(projection.sequence_start(), 2);
    assert_eq!(projection.sequence_end(), 3);
    assert_eq!(projection.status(), Some("ok"));
}
