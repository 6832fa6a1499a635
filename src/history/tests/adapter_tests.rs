//! Adapter tests for history collections.

use crate::history::{
    adapters::memory::{InMemoryAiSummaryRepository, InMemoryPromptEntryRepository},
    domain::{AiSummary, PromptEntry},
    ports::{AiSummaryRepository, PromptEntryRepository},
};
use crate::run::domain::RunId;
use crate::task::domain::TaskId;
use crate::test_support::FixedClock;
use chrono::Duration;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 6, 1, 7, 0, 0)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn latest_prompt_timestamp_tracks_newest_entry(clock: FixedClock) {
    let repository = InMemoryPromptEntryRepository::new();
    let task_id = TaskId::new();

    repository
        .append(&PromptEntry::record(task_id, None, "operator", "first", &clock))
        .await
        .expect("append should succeed");
    let later = FixedClock(clock.0 + Duration::hours(2));
    repository
        .append(&PromptEntry::record(task_id, None, "agent", "second", &later))
        .await
        .expect("append should succeed");

    let latest = repository
        .latest_timestamp_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(latest, Some(later.0));

    let other = repository
        .latest_timestamp_for_task(TaskId::new())
        .await
        .expect("lookup should succeed");
    assert_eq!(other, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_matches_task_or_run(clock: FixedClock) {
    let repository = InMemoryAiSummaryRepository::new();
    let task_id = TaskId::new();
    let stray_task = TaskId::new();
    let run_id = RunId::new();

    repository
        .append(&AiSummary::record(task_id, None, "task summary", &clock))
        .await
        .expect("append should succeed");
    repository
        .append(&AiSummary::record(stray_task, Some(run_id), "run summary", &clock))
        .await
        .expect("append should succeed");
    repository
        .append(&AiSummary::record(stray_task, None, "unrelated", &clock))
        .await
        .expect("append should succeed");

    let removed = repository
        .delete_for_task_or_runs(task_id, &[run_id])
        .await
        .expect("deletion should succeed");

    assert_eq!(removed, 2);
    let remaining = repository
        .list_by_task(stray_task)
        .await
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 1);
}
