//! Given steps for run lifecycle BDD scenarios.

use super::world::{RunLifecycleWorld, run_async};
use brunel::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskKind, TaskPolicies,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

#[given(r#"a task named "{name}""#)]
fn a_named_task(world: &mut RunLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let task = Task::create(
        TaskDefinition {
            repository_id: RepositoryId::new(),
            project_id: ProjectId::new(),
            name,
            kind: TaskKind::OneShot,
            enabled: true,
            cron_expression: None,
            concurrency_limit: 1,
            policies: TaskPolicies::default(),
        },
        &DefaultClock,
    )
    .wrap_err("build task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given("a queued run for the task")]
fn a_queued_run(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let run = run_async(world.service.create_run(task, task.project_id(), 1))
        .wrap_err("dispatch run for scenario")?;
    world.run = Some(run);
    Ok(())
}
