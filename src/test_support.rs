//! Shared clock fixtures for deterministic unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Creates a clock pinned to the given UTC calendar time.
    #[must_use]
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
                .single()
                .expect("valid calendar time"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
