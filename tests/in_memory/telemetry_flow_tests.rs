//! Runtime heartbeats feeding fleet telemetry.

use std::sync::Arc;

use brunel::runtime::domain::{RuntimeId, RuntimeState, RuntimeStateUpdate};
use brunel::runtime::services::RuntimeTelemetryService;
use brunel::store::StoreSession;

use super::helpers::FixedClock;

fn update(id: &str) -> RuntimeStateUpdate {
    RuntimeStateUpdate::new(RuntimeId::new(id).expect("valid runtime id"))
}

#[tokio::test(flavor = "multi_thread")]
async fn heartbeats_accumulate_into_a_fleet_snapshot() {
    let clock = FixedClock::at(2024, 4, 2, 8, 0, 0);
    let session = StoreSession::in_memory();
    let service = RuntimeTelemetryService::new(session.task_runtimes.clone(), Arc::new(clock));

    for id in ["rt-1", "rt-2"] {
        service
            .upsert_state(update(id).with_state(RuntimeState::Ready))
            .await
            .expect("upsert should succeed");
    }
    service
        .upsert_state(update("rt-3").with_state(RuntimeState::Failed).with_error("OOM"))
        .await
        .expect("upsert should succeed");

    let snapshot = service
        .telemetry_snapshot()
        .await
        .expect("snapshot should succeed");

    assert_eq!(snapshot.total_runtimes, 3);
    assert_eq!(snapshot.state_counts.get(&RuntimeState::Ready), Some(&2));
    assert_eq!(snapshot.state_counts.get(&RuntimeState::Failed), Some(&1));
    assert_eq!(snapshot.cold_start_count, 0);
    assert_eq!(snapshot.cold_start_seconds_average, 0.0);
}
