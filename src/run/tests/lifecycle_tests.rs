//! Service orchestration tests for the run lifecycle.

use std::sync::Arc;

use crate::finding::adapters::memory::InMemoryFindingRepository;
use crate::finding::ports::FindingRepository;
use crate::run::{
    adapters::memory::InMemoryRunRepository,
    domain::{ImageProvenance, Run, RunCompletion, RunState},
    services::RunLifecycleService,
};
use crate::runtime::domain::RuntimeId;
use crate::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskKind, TaskPolicies,
};
use crate::test_support::FixedClock;
use rstest::{fixture, rstest};

struct Harness {
    service: RunLifecycleService<FixedClock>,
    findings: Arc<InMemoryFindingRepository>,
}

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 3, 1, 12, 0, 0)
}

#[fixture]
fn harness(clock: FixedClock) -> Harness {
    let findings = Arc::new(InMemoryFindingRepository::new());
    let service = RunLifecycleService::new(
        Arc::new(InMemoryRunRepository::new()),
        findings.clone(),
        Arc::new(clock),
    );
    Harness { service, findings }
}

fn task(clock: &FixedClock) -> Task {
    Task::create(
        TaskDefinition {
            repository_id: RepositoryId::new(),
            project_id: ProjectId::new(),
            name: "Dependency bump".to_owned(),
            kind: TaskKind::OneShot,
            enabled: true,
            cron_expression: None,
            concurrency_limit: 1,
            policies: TaskPolicies::default(),
        },
        clock,
    )
    .expect("valid task")
}

async fn dispatched(harness: &Harness, clock: &FixedClock) -> Run {
    let owning_task = task(clock);
    harness
        .service
        .create_run(&owning_task, owning_task.project_id(), 1)
        .await
        .expect("run creation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_reaches_succeeded_and_ignores_late_cancel(
    harness: Harness,
    clock: FixedClock,
) {
    let run = dispatched(&harness, &clock).await;
    assert_eq!(run.state(), RunState::Queued);

    let started = harness
        .service
        .start_run(
            run.id(),
            RuntimeId::new("rt-1").expect("valid runtime id"),
            ImageProvenance::default(),
        )
        .await
        .expect("start should succeed")
        .expect("run should be startable");
    assert_eq!(started.state(), RunState::Running);

    let completed = harness
        .service
        .complete_run(run.id(), RunCompletion::new(true, "All tests green"))
        .await
        .expect("complete should succeed")
        .expect("run should be completable");
    assert_eq!(completed.state(), RunState::Succeeded);

    // The losing side of the race sees "not applicable", not an error.
    let cancel_result = harness
        .service
        .cancel_run(run.id())
        .await
        .expect("cancel call should succeed");
    assert!(cancel_result.is_none());

    let stored = harness
        .service
        .find_run(run.id())
        .await
        .expect("lookup should succeed")
        .expect("run should exist");
    assert_eq!(stored.state(), RunState::Succeeded);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_completion_raises_a_finding(harness: Harness, clock: FixedClock) {
    let run = dispatched(&harness, &clock).await;

    harness
        .service
        .complete_run(
            run.id(),
            RunCompletion::new(false, "Compile error in worker.rs")
                .with_failure_class("build_failure"),
        )
        .await
        .expect("complete should succeed")
        .expect("run should be completable");

    let has_open = harness
        .findings
        .has_open_for_task(run.task_id())
        .await
        .expect("finding lookup should succeed");
    assert!(has_open);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_completion_raises_no_finding(harness: Harness, clock: FixedClock) {
    let run = dispatched(&harness, &clock).await;

    harness
        .service
        .complete_run(run.id(), RunCompletion::new(true, "done"))
        .await
        .expect("complete should succeed")
        .expect("run should be completable");

    let has_open = harness
        .findings
        .has_open_for_task(run.task_id())
        .await
        .expect("finding lookup should succeed");
    assert!(!has_open);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_gate_round_trip(harness: Harness, clock: FixedClock) {
    let run = dispatched(&harness, &clock).await;

    let parked = harness
        .service
        .request_approval(run.id())
        .await
        .expect("request should succeed")
        .expect("run should be parkable");
    assert_eq!(parked.state(), RunState::PendingApproval);

    let approved = harness
        .service
        .approve_run(run.id())
        .await
        .expect("approve should succeed")
        .expect("run should be approvable");
    assert_eq!(approved.state(), RunState::Queued);
    assert_eq!(approved.summary(), "Approved and queued");

    // Approving again is no longer applicable.
    let again = harness
        .service
        .approve_run(run.id())
        .await
        .expect("approve call should succeed");
    assert!(again.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_cancels_parked_run(harness: Harness, clock: FixedClock) {
    let run = dispatched(&harness, &clock).await;
    harness
        .service
        .request_approval(run.id())
        .await
        .expect("request should succeed")
        .expect("run should be parkable");

    let rejected = harness
        .service
        .reject_run(run.id())
        .await
        .expect("reject should succeed")
        .expect("run should be rejectable");

    assert_eq!(rejected.state(), RunState::Cancelled);
    assert_eq!(rejected.summary(), "Rejected");
    assert!(rejected.ended_at_utc().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_cancel_counts_only_mutated_runs(harness: Harness, clock: FixedClock) {
    let first = dispatched(&harness, &clock).await;
    let second = dispatched(&harness, &clock).await;
    let third = dispatched(&harness, &clock).await;

    harness
        .service
        .complete_run(third.id(), RunCompletion::new(true, "done"))
        .await
        .expect("complete should succeed")
        .expect("run should be completable");

    let cancelled = harness
        .service
        .bulk_cancel_runs(&[first.id(), second.id(), third.id()])
        .await
        .expect("bulk cancel should succeed");

    assert_eq!(cancelled, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transitions_on_unknown_run_return_none(harness: Harness, clock: FixedClock) {
    let stray = dispatched(&harness, &clock).await;
    drop(stray);

    let missing = crate::run::domain::RunId::new();
    let result = harness
        .service
        .cancel_run(missing)
        .await
        .expect("cancel call should succeed");
    assert!(result.is_none());
}
