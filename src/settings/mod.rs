//! System settings stored under a well-known key.
//!
//! Settings are one document with a fixed identifier, lazily initialised
//! to defaults on first read. They carry the retention horizons and scan
//! caps the cleanup engine falls back to when a query does not override
//! them.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
