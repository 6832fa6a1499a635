//! Unit tests for the retention module.


use std::sync::Arc;

use crate::retention::adapters::memory::InMemoryWorkspaceStore;
use crate::retention::services::RetentionEngineService;
use crate::run::domain::{Run, RunCompletion};
use crate::run::ports::RunRepository;
use crate::store::StoreSession;
use crate::task::domain::{
    ProjectId, RepositoryId, Task, TaskDefinition, TaskKind, TaskPolicies,
};
use crate::task::ports::TaskRepository;
use crate::test_support::FixedClock;

struct Harness {
    session: StoreSession,
    workspace: Arc<InMemoryWorkspaceStore>,
    engine: RetentionEngineService<FixedClock>,
}

fn harness_with_workspace(workspace: InMemoryWorkspaceStore, clock: FixedClock) -> Harness {
    let session = StoreSession::in_memory();
    let workspace = Arc::new(workspace);
    let engine = RetentionEngineService::new(session.clone(), workspace.clone(), Arc::new(clock));
    Harness {
        session,
        workspace,
        engine,
    }
}

fn harness(clock: FixedClock) -> Harness {
    harness_with_workspace(InMemoryWorkspaceStore::new(), clock)
}

/// Stores a one-shot task created at the given clock time.
async fn stored_task(session: &StoreSession, name: &str, enabled: bool, clock: &FixedClock) -> Task {
    let task = Task::create(
        TaskDefinition {
            repository_id: RepositoryId::new(),
            project_id: ProjectId::new(),
            name: name.to_owned(),
            kind: TaskKind::OneShot,
            enabled,
            cron_expression: None,
            concurrency_limit: 1,
            policies: TaskPolicies::default(),
        },
        clock,
    )
    .expect("valid task");
    session.tasks.store(&task).await.expect("task store should succeed");
    task
}

/// Stores a run for the task, optionally completed at the same instant.
async fn stored_run(
    session: &StoreSession,
    task: &Task,
    succeeded: Option<bool>,
    clock: &FixedClock,
) -> Run {
    let mut run = Run::dispatch(task, task.project_id(), 1, clock);
    if let Some(success) = succeeded {
        run.complete(RunCompletion::new(success, "settled"), clock)
            .expect("complete from queued");
    }
    session.runs.store(&run).await.expect("run store should succeed");
    run
}
