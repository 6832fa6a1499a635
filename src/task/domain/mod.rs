//! Domain model for task definitions and scheduling.
//!
//! The task domain models validated task creation and update, the
//! kind-dependent `next_run_at_utc` computation, and one-shot consumption
//! while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod schedule;
mod task;

pub use error::{ParseTaskKindError, TaskDomainError};
pub use ids::{ProjectId, RepositoryId, TaskId, TaskName};
pub use schedule::{
    compute_next_run, cron_expression_is_valid, next_occurrence, normalize_cron_expression,
};
pub use task::{PersistedTaskData, Task, TaskDefinition, TaskKind, TaskPolicies, TaskUpdate};
