//! Application services for run lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{RunLifecycleError, RunLifecycleResult, RunLifecycleService};
