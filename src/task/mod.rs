//! Task definitions and scheduling for Brunel.
//!
//! A task is a reusable definition of work to run against a repository:
//! one-shot, cron-scheduled, or event-driven. This module owns task
//! creation and update validation, the computed `next_run_at_utc`
//! timestamp, due-task enumeration, and one-shot consumption. The module
//! follows hexagonal architecture:
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
