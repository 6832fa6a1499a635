//! Adapter implementations of the search ports.

pub mod memory;
