//! Due-task resolution feeding run dispatch, end to end in memory.

use std::sync::Arc;

use brunel::run::domain::RunState;
use brunel::run::services::RunLifecycleService;
use brunel::store::StoreSession;
use brunel::task::domain::TaskKind;
use brunel::task::services::TaskSchedulingService;
use chrono::Duration;

use super::helpers::{FixedClock, stored_task};

#[tokio::test(flavor = "multi_thread")]
async fn due_tasks_consume_and_dispatch_runs() {
    let clock = FixedClock::at(2024, 1, 1, 0, 30, 0);
    let session = StoreSession::in_memory();
    let scheduling = TaskSchedulingService::new(session.tasks.clone(), Arc::new(clock));
    let lifecycle = RunLifecycleService::new(
        session.runs.clone(),
        session.findings.clone(),
        Arc::new(clock),
    );

    let one_shot = stored_task(&session, "One shot", TaskKind::OneShot, None, &clock).await;
    let cron = stored_task(&session, "Hourly", TaskKind::Cron, Some("0 * * * *"), &clock).await;
    stored_task(&session, "Webhook", TaskKind::EventDriven, None, &clock).await;

    // At creation time only the one-shot is due.
    let due_now = scheduling
        .list_due_tasks(clock.0, 10)
        .await
        .expect("due listing should succeed");
    assert_eq!(due_now.len(), 1);

    // One hour later the cron task has come due as well.
    let later = clock.0 + Duration::hours(1);
    let due_later = scheduling
        .list_due_tasks(later, 10)
        .await
        .expect("due listing should succeed");
    let due_ids: Vec<_> = due_later.iter().map(|task| task.id()).collect();
    assert!(due_ids.contains(&one_shot.id()));
    assert!(due_ids.contains(&cron.id()));

    // Dispatch each due task and consume it.
    for task in &due_later {
        let run = lifecycle
            .create_run(task, task.project_id(), 1)
            .await
            .expect("run creation should succeed");
        assert_eq!(run.state(), RunState::Queued);
        scheduling
            .consume_task(task.id())
            .await
            .expect("consume should succeed")
            .expect("task should exist");
    }

    // The consumed one-shot disappears from the due listing; the cron
    // task advanced to the next occurrence after the (pinned) clock.
    let advanced = scheduling
        .find_task(cron.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(
        advanced.next_run_at_utc(),
        Some(clock.0 + Duration::minutes(30))
    );

    let due_after = scheduling
        .list_due_tasks(clock.0, 10)
        .await
        .expect("due listing should succeed");
    assert!(due_after.is_empty());
}
