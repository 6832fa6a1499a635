//! Workflow stages referencing tasks.
//!
//! A workflow chains tasks into ordered stages. The control-plane core
//! only needs the reference direction: a task that a workflow stage
//! points at is protected from retention cleanup. References are plain
//! foreign-key lookups, never object-graph pointers.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
