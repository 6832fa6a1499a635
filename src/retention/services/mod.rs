//! Application services for retention and cascade deletion.

mod engine;

pub use engine::{RetentionEngineService, RetentionError, RetentionResult};
