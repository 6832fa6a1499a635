//! Application services for runtime telemetry tracking.

mod tracker;

pub use tracker::{RuntimeTelemetryError, RuntimeTelemetryResult, RuntimeTelemetryService};
