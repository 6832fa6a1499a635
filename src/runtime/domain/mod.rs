//! Domain model for task runtimes and their telemetry.

mod error;
mod ids;
mod runtime;
mod state;
mod telemetry;

pub use error::{ParseRuntimeStateError, RuntimeDomainError};
pub use ids::RuntimeId;
pub use runtime::{RuntimeStateUpdate, TaskRuntime};
pub use state::RuntimeState;
pub use telemetry::RuntimeTelemetrySnapshot;
