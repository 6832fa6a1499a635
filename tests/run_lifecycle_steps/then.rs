//! Then steps for run lifecycle BDD scenarios.

use super::world::RunLifecycleWorld;
use brunel::run::domain::RunState;
use eyre::ensure;
use rstest_bdd_macros::then;

fn current_run(world: &RunLifecycleWorld) -> Result<&brunel::run::domain::Run, eyre::Report> {
    world
        .run
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run in scenario world"))
}

#[then(r#"the run state is "{state}""#)]
fn run_state_is(world: &mut RunLifecycleWorld, state: String) -> Result<(), eyre::Report> {
    let expected = RunState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("unknown expected state: {err}"))?;
    let run = current_run(world)?;
    ensure!(
        run.state() == expected,
        "expected state {expected}, got {}",
        run.state()
    );
    Ok(())
}

#[then("the cancellation does not apply")]
fn cancellation_not_applicable(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_cancel_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no cancellation was attempted"))?;
    ensure!(result.is_none(), "cancellation unexpectedly applied");
    Ok(())
}

#[then(r#"the run summary is "{summary}""#)]
fn run_summary_is(world: &mut RunLifecycleWorld, summary: String) -> Result<(), eyre::Report> {
    let run = current_run(world)?;
    ensure!(
        run.summary() == summary,
        "expected summary {summary:?}, got {:?}",
        run.summary()
    );
    Ok(())
}

#[then("the run has an end timestamp")]
fn run_has_end(world: &mut RunLifecycleWorld) -> Result<(), eyre::Report> {
    let run = current_run(world)?;
    ensure!(run.ended_at_utc().is_some(), "run has no end timestamp");
    Ok(())
}
