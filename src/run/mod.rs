//! Run lifecycle management for Brunel.
//!
//! A run is one execution instance of a task. This module owns the run
//! state machine (`Queued` through the terminal states), the named
//! transition operations with their race-tolerant no-op semantics, and
//! the thin side collections that describe a run: log entries and diff
//! snapshots. The module follows hexagonal architecture:
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
