//! Deriving tool-call observations from structured events.

use super::StructuredEvent;
use crate::run::domain::RunId;
use serde_json::Value;

/// Payload keys that identify a tool invocation.
const TOOL_CALL_ID_KEYS: [&str; 3] = ["toolCallId", "callId", "id"];
/// Payload keys that name the invoked tool.
const TOOL_NAME_KEYS: [&str; 3] = ["toolName", "name", "tool"];
/// Payload keys carrying the invocation input.
const INPUT_KEYS: [&str; 2] = ["input", "arguments"];
/// Payload keys carrying the invocation output.
const OUTPUT_KEYS: [&str; 2] = ["output", "result"];

/// What a structured event contributed towards a tool projection.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallDerivation {
    /// The event does not describe a tool invocation.
    NotToolRelated,
    /// The event looks tool-related but its payload is not valid JSON;
    /// the event is stored regardless and only projection is skipped.
    MalformedPayload,
    /// A usable observation.
    Observed(ToolCallObservation),
}

/// One event's view of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallObservation {
    /// Owning run.
    pub run_id: RunId,
    /// Sequence of the contributing event.
    pub sequence: u64,
    /// Tool-call identity, when the payload carries one.
    pub tool_call_id: Option<String>,
    /// Tool name, when the payload carries one.
    pub tool_name: Option<String>,
    /// Reported invocation status, when the payload carries one.
    pub status: Option<String>,
    /// Invocation input payload.
    pub input_json: Option<Value>,
    /// Invocation output payload.
    pub output_json: Option<Value>,
}

/// Examines a stored event for tool-call content.
///
/// An event is tool-related when its type or category mentions "tool"
/// (case-insensitive), or when its JSON payload carries recognisable
/// tool-call marker fields. When no explicit input or output field is
/// present the raw payload doubles as the input.
#[must_use]
pub fn derive_tool_call(event: &StructuredEvent) -> ToolCallDerivation {
    let type_hint = mentions_tool(event.event_type()) || mentions_tool(event.category());
    let payload_raw = event.payload_json().trim();

    if payload_raw.is_empty() {
        if type_hint {
            return ToolCallDerivation::Observed(ToolCallObservation {
                run_id: event.run_id(),
                sequence: event.sequence(),
                ..ToolCallObservation::default()
            });
        }
        return ToolCallDerivation::NotToolRelated;
    }

    let Ok(payload) = serde_json::from_str::<Value>(payload_raw) else {
        if type_hint {
            return ToolCallDerivation::MalformedPayload;
        }
        return ToolCallDerivation::NotToolRelated;
    };

    let tool_call_id = string_field(&payload, &TOOL_CALL_ID_KEYS);
    let tool_name = string_field(&payload, &TOOL_NAME_KEYS);
    if !type_hint && tool_call_id.is_none() && tool_name.is_none() {
        return ToolCallDerivation::NotToolRelated;
    }

    let input_json = value_field(&payload, &INPUT_KEYS);
    let output_json = value_field(&payload, &OUTPUT_KEYS);
    let fallback_input = if input_json.is_none() && output_json.is_none() {
        Some(payload.clone())
    } else {
        input_json
    };

    ToolCallDerivation::Observed(ToolCallObservation {
        run_id: event.run_id(),
        sequence: event.sequence(),
        tool_call_id,
        tool_name,
        status: string_field(&payload, &["status", "state"]),
        input_json: fallback_input,
        output_json,
    })
}

fn mentions_tool(value: &str) -> bool {
    value.to_ascii_lowercase().contains("tool")
}

fn string_field(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().copied().find_map(|key| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    })
}

fn value_field(payload: &Value, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .copied()
        .find_map(|key| payload.get(key).cloned())
}
