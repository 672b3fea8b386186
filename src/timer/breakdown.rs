use std::fmt::Display;

use chrono::Duration;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Remaining time split into display units. Components are never negative and days are not
/// capped, so a fresh 80 year timer shows tens of thousands of days.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct Breakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Breakdown {
    /// Decomposes `duration` with fixed unit sizes. Sub-second remainders are truncated and
    /// anything at or below zero becomes an all-zero breakdown.
    pub fn from_duration(duration: Duration) -> Self {
        if duration <= Duration::zero() {
            return Self::default();
        }

        let total = duration.num_seconds();
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// `D:HH:MM:SS`
impl Display for Breakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
