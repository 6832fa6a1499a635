//! Shared fixtures for in-memory integration tests.

use brunel::store::StoreSession;
use brunel::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskKind, TaskPolicies,
};
use brunel::task::ports::TaskRepository;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Creates a clock pinned to the given UTC calendar time.
    ///
    /// # Panics
    ///
    /// Panics on an impossible calendar time, which is a broken fixture.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        match Utc
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
        {
            Some(instant) => Self(instant),
            None => panic!("invalid fixture calendar time"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds and stores a task through the session's task collection.
///
/// # Panics
///
/// Panics when the fixture definition is invalid or the in-memory store
/// rejects it; both mean the test itself is broken.
pub async fn stored_task(
    session: &StoreSession,
    name: &str,
    kind: TaskKind,
    cron_expression: Option<&str>,
    clock: &FixedClock,
) -> Task {
    let definition = TaskDefinition {
        repository_id: RepositoryId::new(),
        project_id: ProjectId::new(),
        name: name.to_owned(),
        kind,
        enabled: true,
        cron_expression: cron_expression.map(str::to_owned),
        concurrency_limit: 1,
        policies: TaskPolicies::default(),
    };
    let task = match Task::create(definition, clock) {
        Ok(task) => task,
        Err(err) => panic!("invalid task fixture: {err}"),
    };
    if let Err(err) = session.tasks.store(&task).await {
        panic!("task fixture store failed: {err}");
    }
    task
}
