//! Task-runtime registration and telemetry for Brunel.
//!
//! A task runtime is an ephemeral compute unit (typically a container)
//! that executes runs and reports heartbeats. This module tracks runtime
//! state transitions and derives cold-start and idle telemetry used for
//! autoscaling and observability. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
