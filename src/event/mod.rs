//! Structured run events and derived tool-call projections.
//!
//! Runners report typed, sequenced records of what happened during a run:
//! tool calls, log milestones, diffs, errors. This module normalises and
//! stores those records idempotently and derives deduplicated tool-call
//! projections by merging sequential records that share a tool-call
//! identity. The module follows hexagonal architecture:
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
