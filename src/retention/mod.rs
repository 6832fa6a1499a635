//! Cleanup candidates, cascading deletion, and event pruning.
//!
//! The retention engine keeps the store consistent as tasks age out:
//! it finds stale tasks, deletes a task together with everything that
//! exists only to describe it (children before parents), and reclaims
//! verbose structured data from old terminal runs while preserving the
//! runs themselves. Database deletes are authoritative; workspace
//! directory removal is a best-effort second phase with its own error
//! channel.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
