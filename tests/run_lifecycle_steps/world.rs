//! Shared world state for run lifecycle BDD scenarios.

use std::sync::Arc;

use brunel::finding::adapters::memory::InMemoryFindingRepository;
use brunel::run::adapters::memory::InMemoryRunRepository;
use brunel::run::domain::Run;
use brunel::run::services::RunLifecycleService;
use brunel::task::domain::Task;
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestRunService = RunLifecycleService<DefaultClock>;

/// Scenario world for run lifecycle behaviour tests.
pub struct RunLifecycleWorld {
    pub service: TestRunService,
    pub task: Option<Task>,
    pub run: Option<Run>,
    pub last_cancel_result: Option<Option<Run>>,
}

impl RunLifecycleWorld {
    /// Creates a world with empty pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let service = RunLifecycleService::new(
            Arc::new(InMemoryRunRepository::new()),
            Arc::new(InMemoryFindingRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            task: None,
            run: None,
            last_cancel_result: None,
        }
    }
}

impl Default for RunLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RunLifecycleWorld {
    RunLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
