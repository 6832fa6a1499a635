//! Unit tests for the runtime module.
