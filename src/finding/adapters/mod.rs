//! Adapter implementations of the finding ports.

pub mod memory;
