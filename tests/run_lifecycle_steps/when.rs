//! When steps for run lifecycle BDD scenarios.

use super::world::{RunLifecycleWorld, run_async};
use brunel::run::domain::{ImageProvenance, RunCompletion};
use brunel::runtime::domain::RuntimeId;
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn current_run_id(world: &RunLifecycleWorld) -> Result<brunel::run::domain::RunId, eyre::Report> {
    world
        .run
        .as_ref()
        .map(brunel::run::domain::Run::id)
        .ok_or_else(|| eyre::eyre!("missing run in scenario world"))
}

#[when(r#"the run is started on runtime "{runtime_id}""#)]
fn start_run(world: &mut RunLifecycleWorld, runtime_id: String) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let runtime = RuntimeId::new(runtime_id).wrap_err("build runtime id")?;
    let started = run_async(world.service.start_run(
        run_id,
        runtime,
        ImageProvenance::default(),
    ))
    .wrap_err("start run in scenario")?
    .ok_or_else(|| eyre::eyre!("start did not apply"))?;
    world.run = Some(started);
    Ok(())
}

#[when(r#"the run is completed successfully with summary "{summary}""#)]
fn complete_run(world: &mut RunLifecycleWorld, summary: String) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let completed = run_async(
        world
            .service
            .complete_run(run_id, RunCompletion::new(true, summary)),
    )
    .wrap_err("complete run in scenario")?
    .ok_or_else(|| eyre::eyre!("complete did not apply"))?;
    world.run = Some(completed);
    Ok(())
}

#[when("a cancellation is attempted")]
fn attempt_cancel(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let result =
        run_async(world.service.cancel_run(run_id)).wrap_err("cancel run in scenario")?;
    if let Some(cancelled) = result.clone() {
        world.run = Some(cancelled);
    }
    world.last_cancel_result = Some(result);
    Ok(())
}

#[when("approval is requested for the run")]
fn request_approval(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let parked = run_async(world.service.request_approval(run_id))
        .wrap_err("request approval in scenario")?
        .ok_or_else(|| eyre::eyre!("approval request did not apply"))?;
    world.run = Some(parked);
    Ok(())
}

#[when("the run is approved")]
fn approve_run(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let approved = run_async(world.service.approve_run(run_id))
        .wrap_err("approve run in scenario")?
        .ok_or_else(|| eyre::eyre!("approve did not apply"))?;
    world.run = Some(approved);
    Ok(())
}

#[when("the run is rejected")]
fn reject_run(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let run_id = current_run_id(world)?;
    let rejected = run_async(world.service.reject_run(run_id))
        .wrap_err("reject run in scenario")?
        .ok_or_else(|| eyre::eyre!("reject did not apply"))?;
    world.run = Some(rejected);
    Ok(())
}
