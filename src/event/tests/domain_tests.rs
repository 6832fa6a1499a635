//! Domain-focused tests for event normalisation and tool-call derivation.

use crate::event::domain::{
    StructuredEvent, StructuredEventDraft, ToolCallDerivation, ToolCallObservation,
    ToolProjection, derive_tool_call,
};
use crate::run::domain::RunId;
use crate::test_support::FixedClock;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 5, 1, 10, 0, 0)
}

fn stored(draft: StructuredEventDraft, clock: &FixedClock) -> StructuredEvent {
    StructuredEvent::normalize(draft, clock)
}

#[rstest]
fn normalisation_trims_and_defaults(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 3)
            .with_category("  progress  ")
            .with_summary("  half way  "),
        &clock,
    );

    assert_eq!(event.event_type(), "unknown");
    assert_eq!(event.category(), "progress");
    assert_eq!(event.summary(), "half way");
    assert_eq!(event.error(), "");
    assert_eq!(event.schema_version(), 1);
    assert_eq!(event.timestamp_utc(), clock.0);
}

#[rstest]
fn whitespace_event_type_defaults_to_unknown(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 1).with_event_type("   "),
        &clock,
    );
    assert_eq!(event.event_type(), "unknown");
}

#[rstest]
fn plain_log_event_is_not_tool_related(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 1)
            .with_event_type("log")
            .with_payload(r#"{"message": "compiling"}"#),
        &clock,
    );
    assert_eq!(derive_tool_call(&event), ToolCallDerivation::NotToolRelated);
}

#[rstest]
#[case("tool_call")]
#[case("ToolResult")]
fn tool_typed_event_is_derived_even_without_payload(#[case] event_type: &str, clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 4).with_event_type(event_type),
        &clock,
    );
    assert!(matches!(
        derive_tool_call(&event),
        ToolCallDerivation::Observed(_)
    ));
}

#[rstest]
fn payload_markers_alone_mark_tool_relation(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 2)
            .with_event_type("trace")
            .with_payload(r#"{"toolName": "grep", "input": {"pattern": "fn main"}}"#),
        &clock,
    );

    let ToolCallDerivation::Observed(observation) = derive_tool_call(&event) else {
        panic!("expected an observation");
    };
    assert_eq!(observation.tool_name.as_deref(), Some("grep"));
    assert_eq!(observation.input_json, Some(json!({"pattern": "fn main"})));
    assert_eq!(observation.output_json, None);
}

#[rstest]
fn explicit_fields_win_over_raw_payload(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 5)
            .with_event_type("tool_result")
            .with_payload(r#"{"callId": "c-9", "result": {"exit": 0}, "status": "ok"}"#),
        &clock,
    );

    let ToolCallDerivation::Observed(observation) = derive_tool_call(&event) else {
        panic!("expected an observation");
    };
    assert_eq!(observation.tool_call_id.as_deref(), Some("c-9"));
    assert_eq!(observation.status.as_deref(), Some("ok"));
    assert_eq!(observation.output_json, Some(json!({"exit": 0})));
    // No explicit input, but an explicit output: the raw payload is not
    // used as a fallback input.
    assert_eq!(observation.input_json, None);
}

#[rstest]
fn raw_payload_falls_back_as_input(clock: FixedClock) {
    let payload = json!({"toolName": "cargo", "verbose": true});
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 6)
            .with_event_type("tool_call")
            .with_payload(payload.to_string()),
        &clock,
    );

    let ToolCallDerivation::Observed(observation) = derive_tool_call(&event) else {
        panic!("expected an observation");
    };
    assert_eq!(observation.input_json, Some(payload));
}

#[rstest]
fn malformed_payload_on_tool_event_is_flagged(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 7)
            .with_event_type("tool_call")
            .with_payload("{not json"),
        &clock,
    );
    assert_eq!(derive_tool_call(&event), ToolCallDerivation::MalformedPayload);
}

#[rstest]
fn malformed_payload_without_hint_is_ignored(clock: FixedClock) {
    let event = stored(
        StructuredEventDraft::new(RunId::new(), 8)
            .with_event_type("log")
            .with_payload("{not json"),
        &clock,
    );
    assert_eq!(derive_tool_call(&event), ToolCallDerivation::NotToolRelated);
}

fn observation(run_id: RunId, sequence: u64, id: Option<&str>) -> ToolCallObservation {
    ToolCallObservation {
        run_id,
        sequence,
        tool_call_id: id.map(str::to_owned),
        ..ToolCallObservation::default()
    }
}

#[rstest]
fn sequence_range_only_widens(clock: FixedClock) {
    let run_id = RunId::new();
    let mut projection =
        ToolProjection::from_observation(observation(run_id, 5, Some("c-1")), &clock);
    assert_eq!(projection.sequence_start(), 5);
    assert_eq!(projection.sequence_end(), 5);

    projection.absorb(observation(run_id, 8, Some("c-1")), &clock);
    assert_eq!(projection.sequence_start(), 5);
    assert_eq!(projection.sequence_end(), 8);

    projection.absorb(observation(run_id, 3, Some("c-1")), &clock);
    assert_eq!(projection.sequence_start(), 3);
    assert_eq!(projection.sequence_end(), 8);

    // An interior sequence moves neither bound.
    projection.absorb(observation(run_id, 6, Some("c-1")), &clock);
    assert_eq!(projection.sequence_start(), 3);
    assert_eq!(projection.sequence_end(), 8);
}

#[rstest]
fn absorb_overwrites_descriptive_fields_with_latest(clock: FixedClock) {
    let run_id = RunId::new();
    let mut first = observation(run_id, 1, Some("c-1"));
    first.tool_name = Some("grep".to_owned());
    first.status = Some("running".to_owned());
    first.input_json = Some(json!({"pattern": "x"}));
    let mut projection = ToolProjection::from_observation(first, &clock);

    let mut second = observation(run_id, 2, Some("c-1"));
    second.status = Some("ok".to_owned());
    second.output_json = Some(json!({"matches": 3}));
    projection.absorb(second, &clock);

    assert_eq!(projection.tool_name(), Some("grep"));
    assert_eq!(projection.status(), Some("ok"));
    assert_eq!(projection.input_json(), Some(&json!({"pattern": "x"})));
    assert_eq!(projection.output_json(), Some(&json!({"matches": 3})));
}

#[rstest]
fn identity_matching_prefers_tool_call_id(clock: FixedClock) {
    let run_id = RunId::new();
    let projection = ToolProjection::from_observation(observation(run_id, 5, Some("c-1")), &clock);

    // Same id far away in the sequence still matches.
    assert!(projection.matches(&observation(run_id, 40, Some("c-1"))));
    // A different id adjacent in the sequence does not.
    assert!(!projection.matches(&observation(run_id, 6, Some("c-2"))));
    // Another run never matches.
    assert!(!projection.matches(&observation(RunId::new(), 5, Some("c-1"))));
}

#[rstest]
fn anonymous_observations_match_by_adjacency(clock: FixedClock) {
    let run_id = RunId::new();
    let projection = ToolProjection::from_observation(observation(run_id, 5, None), &clock);

    assert!(projection.matches(&observation(run_id, 4, None)));
    assert!(projection.matches(&observation(run_id, 6, None)));
    assert!(!projection.matches(&observation(run_id, 8, None)));
}
