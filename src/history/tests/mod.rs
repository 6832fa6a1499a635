//! Unit tests for the history module.

mod adapter_tests;
