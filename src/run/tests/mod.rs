//! Unit tests for the run module.

mod lifecycle_tests;

use crate::run::domain::{ImageProvenance, PersistedRunData, Run, RunId, RunState};
use crate::task::domain::{ProjectId, RepositoryId, TaskId};
use chrono::{DateTime, Utc};

/// Builds a run pinned to an arbitrary lifecycle state for table tests.
fn run_in_state(state: RunState, created_at_utc: DateTime<Utc>) -> Run {
    let terminal = state.is_terminal();
    Run::from_persisted(PersistedRunData {
        id: RunId::new(),
        task_id: TaskId::new(),
        repository_id: RepositoryId::new(),
        project_id: ProjectId::new(),
        state,
        attempt: 1,
        created_at_utc,
        started_at_utc: None,
        ended_at_utc: terminal.then_some(created_at_utc),
        summary: String::new(),
        output_json: None,
        failure_class: None,
        pr_url: None,
        runtime_id: None,
        image_provenance: ImageProvenance::default(),
    })
}
