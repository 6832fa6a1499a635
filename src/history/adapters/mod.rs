//! Adapter implementations of the history ports.

pub mod memory;
