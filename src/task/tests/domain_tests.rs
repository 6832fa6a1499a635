//! Domain-focused tests for task creation, update, and consumption.

use crate::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskDomainError, TaskKind, TaskName,
    TaskPolicies, TaskUpdate,
};
use crate::test_support::FixedClock;
use chrono::Duration;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 1, 1, 0, 30, 0)
}

fn definition(kind: TaskKind, cron_expression: Option<&str>) -> TaskDefinition {
    TaskDefinition {
        repository_id: RepositoryId::new(),
        project_id: ProjectId::new(),
        name: "Nightly triage".to_owned(),
        kind,
        enabled: true,
        cron_expression: cron_expression.map(str::to_owned),
        concurrency_limit: 1,
        policies: TaskPolicies::default(),
    }
}

#[rstest]
fn task_name_rejects_whitespace_only() {
    assert_eq!(TaskName::new("   "), Err(TaskDomainError::EmptyTaskName));
}

#[rstest]
fn task_name_trims_surrounding_whitespace() {
    let name = TaskName::new("  triage  ").expect("valid name");
    assert_eq!(name.as_str(), "triage");
}

#[rstest]
#[case("one_shot", TaskKind::OneShot)]
#[case("CRON", TaskKind::Cron)]
#[case(" event_driven ", TaskKind::EventDriven)]
fn task_kind_parses_canonical_forms(#[case] raw: &str, #[case] expected: TaskKind) {
    assert_eq!(TaskKind::try_from(raw), Ok(expected));
}

#[rstest]
fn task_kind_rejects_unknown_values() {
    assert!(TaskKind::try_from("periodic").is_err());
}

#[rstest]
fn cron_task_at_half_past_schedules_top_of_hour(clock: FixedClock) {
    let task =
        Task::create(definition(TaskKind::Cron, Some("0 * * * *")), &clock).expect("valid task");

    let expected = clock.0 + Duration::minutes(30);
    assert_eq!(task.next_run_at_utc(), Some(expected));
    assert_eq!(task.created_at_utc(), clock.0);
}

#[rstest]
fn one_shot_task_is_due_at_creation(clock: FixedClock) {
    let task = Task::create(definition(TaskKind::OneShot, None), &clock).expect("valid task");

    assert_eq!(task.next_run_at_utc(), Some(clock.0));
    assert!(task.is_due(clock.0));
}

#[rstest]
fn event_driven_task_has_no_next_run(clock: FixedClock) {
    let task = Task::create(definition(TaskKind::EventDriven, None), &clock).expect("valid task");

    assert_eq!(task.next_run_at_utc(), None);
    assert!(!task.is_due(clock.0 + Duration::days(1)));
}

#[rstest]
fn cron_task_requires_an_expression(clock: FixedClock) {
    let result = Task::create(definition(TaskKind::Cron, None), &clock);
    assert_eq!(result, Err(TaskDomainError::MissingCronExpression));
}

#[rstest]
fn cron_task_rejects_malformed_expression(clock: FixedClock) {
    let result = Task::create(definition(TaskKind::Cron, Some("every hour")), &clock);
    assert_eq!(
        result,
        Err(TaskDomainError::InvalidCronExpression("every hour".to_owned()))
    );
}

#[rstest]
#[case(TaskKind::OneShot)]
#[case(TaskKind::EventDriven)]
fn non_cron_task_rejects_expression(#[case] kind: TaskKind, clock: FixedClock) {
    let result = Task::create(definition(kind, Some("0 * * * *")), &clock);
    assert_eq!(result, Err(TaskDomainError::UnexpectedCronExpression(kind)));
}

#[rstest]
fn zero_concurrency_limit_is_rejected(clock: FixedClock) {
    let mut shape = definition(TaskKind::OneShot, None);
    shape.concurrency_limit = 0;

    let result = Task::create(shape, &clock);
    assert_eq!(result, Err(TaskDomainError::InvalidConcurrencyLimit));
}

#[rstest]
fn disabling_update_clears_next_run(clock: FixedClock) {
    let mut task =
        Task::create(definition(TaskKind::Cron, Some("0 * * * *")), &clock).expect("valid task");

    task.apply_update(TaskUpdate::new().with_enabled(false), &clock)
        .expect("valid update");

    assert!(!task.enabled());
    assert_eq!(task.next_run_at_utc(), None);
}

#[rstest]
fn update_rejecting_validation_leaves_task_unchanged(clock: FixedClock) {
    let mut task =
        Task::create(definition(TaskKind::Cron, Some("0 * * * *")), &clock).expect("valid task");
    let before = task.clone();

    let result = task.apply_update(
        TaskUpdate::new().with_cron_expression("not a schedule"),
        &clock,
    );

    assert_eq!(
        result,
        Err(TaskDomainError::InvalidCronExpression(
            "not a schedule".to_owned()
        ))
    );
    assert_eq!(task, before);
}

#[rstest]
fn clearing_cron_expression_on_cron_task_is_rejected(clock: FixedClock) {
    let mut task =
        Task::create(definition(TaskKind::Cron, Some("0 * * * *")), &clock).expect("valid task");

    let result = task.apply_update(TaskUpdate::new().clearing_cron_expression(), &clock);

    assert_eq!(result, Err(TaskDomainError::MissingCronExpression));
}

#[rstest]
fn consuming_one_shot_disables_it(clock: FixedClock) {
    let mut task = Task::create(definition(TaskKind::OneShot, None), &clock).expect("valid task");

    task.consume(&clock);
    assert!(!task.enabled());
    assert_eq!(task.next_run_at_utc(), None);

    // Consuming again is harmless.
    task.consume(&clock);
    assert!(!task.enabled());
    assert_eq!(task.next_run_at_utc(), None);
}

#[rstest]
fn consuming_cron_task_advances_schedule(clock: FixedClock) {
    let mut task =
        Task::create(definition(TaskKind::Cron, Some("0 * * * *")), &clock).expect("valid task");

    let later = FixedClock(clock.0 + Duration::minutes(31));
    task.consume(&later);

    let expected = clock.0 + Duration::minutes(90);
    assert_eq!(task.next_run_at_utc(), Some(expected));
    assert!(task.enabled());
}
