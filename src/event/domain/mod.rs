//! Domain model for structured events and tool projections.

mod event;
mod ids;
mod projection;
mod tool_call;

pub use event::{StructuredEvent, StructuredEventDraft};
pub use ids::ToolProjectionId;
pub use projection::ToolProjection;
pub use tool_call::{ToolCallDerivation, ToolCallObservation, derive_tool_call};
