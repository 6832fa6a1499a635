//! Reliability metrics over run history.
//!
//! Success rates, failure trends, and duration statistics computed in
//! memory over a sliding 30-day window of runs, globally and per
//! repository. Aggregation is deliberately store-agnostic: the window is
//! fetched once and folded here, pinning rounding and grouping semantics
//! independently of the backing store.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
