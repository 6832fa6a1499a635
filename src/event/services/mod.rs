//! Application services for event ingestion and projection.

mod pipeline;

pub use pipeline::{EventPipelineError, EventPipelineResult, EventPipelineService};
