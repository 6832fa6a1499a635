//! Service orchestration tests for the event pipeline.

use std::sync::Arc;

use crate::event::{
    adapters::memory::{InMemoryStructuredEventRepository, InMemoryToolProjectionRepository},
    domain::StructuredEventDraft,
    services::EventPipelineService,
};
use crate::finding::adapters::memory::InMemoryFindingRepository;
use crate::run::{
    adapters::memory::InMemoryRunRepository,
    domain::Run,
    services::RunLifecycleService,
};
use crate::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskKind, TaskPolicies,
};
use crate::test_support::FixedClock;
use rstest::{fixture, rstest};

struct Harness {
    pipeline: EventPipelineService<FixedClock>,
    lifecycle: RunLifecycleService<FixedClock>,
}

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 5, 1, 10, 0, 0)
}

#[fixture]
fn harness(clock: FixedClock) -> Harness {
    let runs = Arc::new(InMemoryRunRepository::new());
    let pipeline = EventPipelineService::new(
        Arc::new(InMemoryStructuredEventRepository::new()),
        Arc::new(InMemoryToolProjectionRepository::new()),
        runs.clone(),
        Arc::new(clock),
    );
    let lifecycle = RunLifecycleService::new(
        runs,
        Arc::new(InMemoryFindingRepository::new()),
        Arc::new(clock),
    );
    Harness { pipeline, lifecycle }
}

async fn dispatched_run(harness: &Harness, clock: &FixedClock) -> Run {
    let task = Task::create(
        TaskDefinition {
            repository_id: RepositoryId::new(),
            project_id: ProjectId::new(),
            name: "Event source".to_owned(),
            kind: TaskKind::OneShot,
            enabled: true,
            cron_expression: None,
            concurrency_limit: 1,
            policies: TaskPolicies::default(),
        },
        clock,
    )
    .expect("valid task");
    harness
        .lifecycle
        .create_run(&task, task.project_id(), 1)
        .await
        .expect("run creation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ingestion_backfills_references_from_run(harness: Harness, clock: FixedClock) {
    let run = dispatched_run(&harness, &clock).await;

    let event = harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1).with_event_type("log"),
        )
        .await
        .expect("ingestion should succeed");

    assert_eq!(event.repository_id(), Some(run.repository_id()));
    assert_eq!(event.task_id(), Some(run.task_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reingestion_updates_in_place(harness: Harness, clock: FixedClock) {
    let run = dispatched_run(&harness, &clock).await;

    harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1)
                .with_event_type("log")
                .with_summary("first"),
        )
        .await
        .expect("first ingestion should succeed");
    harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1)
                .with_event_type("log")
                .with_summary("second"),
        )
        .await
        .expect("second ingestion should succeed");

    let events = harness
        .pipeline
        .list_run_events(run.id())
        .await
        .expect("listing should succeed");
    assert_eq!(events.len(), 1);
    assert_eq!(
        events.first().map(crate::event::domain::StructuredEvent::summary),
        Some("second")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tool_call_and_result_merge_into_one_projection(harness: Harness, clock: FixedClock) {
    let run = dispatched_run(&harness, &clock).await;

    harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 10)
                .with_event_type("tool_call")
                .with_payload(
                    r#"{"toolCallId": "c-1", "toolName": "cargo", "input": {"cmd": "check"}}"#,
                ),
        )
        .await
        .expect("call ingestion should succeed");
    harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 11)
                .with_event_type("tool_result")
                .with_payload(r#"{"toolCallId": "c-1", "status": "ok", "output": {"exit": 0}}"#),
        )
        .await
        .expect("result ingestion should succeed");

    let projections = harness
        .pipeline
        .list_run_tool_projections(run.id())
        .await
        .expect("listing should succeed");
    assert_eq!(projections.len(), 1);

    let projection = projections.first().expect("one projection");
    assert_eq!(projection.tool_call_id(), Some("c-1"));
    assert_eq!(projection.tool_name(), Some("cargo"));
    assert_eq!(projection.status(), Some("ok"));
    assert_eq!(projection.sequence_start(), 10);
    assert_eq!(projection.sequence_end(), 11);
    assert!(projection.input_json().is_some());
    assert!(projection.output_json().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn distinct_tool_calls_stay_separate(harness: Harness, clock: FixedClock) {
    let run = dispatched_run(&harness, &clock).await;

    for (sequence, call_id) in [(1u64, "c-1"), (2, "c-2")] {
        harness
            .pipeline
            .append_structured_event(
                StructuredEventDraft::new(run.id(), sequence)
                    .with_event_type("tool_call")
                    .with_payload(format!(r#"{{"toolCallId": "{call_id}"}}"#)),
            )
            .await
            .expect("ingestion should succeed");
    }

    let projections = harness
        .pipeline
        .list_run_tool_projections(run.id())
        .await
        .expect("listing should succeed");
    assert_eq!(projections.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_payload_still_stores_the_event(harness: Harness, clock: FixedClock) {
    let run = dispatched_run(&harness, &clock).await;

    harness
        .pipeline
        .append_structured_event(
            StructuredEventDraft::new(run.id(), 1)
                .with_event_type("tool_call")
                .with_payload("{definitely not json"),
        )
        .await
        .expect("ingestion should succeed");

    let events = harness
        .pipeline
        .list_run_events(run.id())
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 1);

    let projections = harness
        .pipeline
        .list_run_tool_projections(run.id())
        .await
        .expect("projection listing should succeed");
    assert!(projections.is_empty());
}
