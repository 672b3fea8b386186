use chrono::{DateTime, Duration, Local, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::breakdown::Breakdown;

/// The persisted pair a countdown is derived from. Everything else (end date, remaining time,
/// expiration) is computed against a supplied "now", because "now" changes on every tick.
///
/// Records are never edited in place. A new setup replaces the whole record.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    birthday: DateTime<Utc>,
    expected_lifespan_years: u32,
}

impl TimerRecord {
    pub fn new(birthday: DateTime<Utc>, expected_lifespan_years: u32) -> Self {
        Self {
            birthday,
            expected_lifespan_years,
        }
    }

    pub fn birthday(&self) -> DateTime<Utc> {
        self.birthday
    }

    pub fn expected_lifespan_years(&self) -> u32 {
        self.expected_lifespan_years
    }

    /// Birthday plus the lifespan in whole calendar years of the user's local calendar.
    /// See [Self::expected_end_date_in].
    pub fn expected_end_date(&self) -> DateTime<Utc> {
        self.expected_end_date_in(&Local)
    }

    /// Adds `12 * years` months to the birthday's wall-clock time in `calendar`. A Feb 29
    /// birthday landing on a common year clamps to Feb 28 and the end keeps the birthday's
    /// local time of day across DST changes. A wall time skipped by a DST gap moves one hour
    /// forward. An end past the representable range falls back to the birthday itself.
    pub fn expected_end_date_in<Tz: TimeZone>(&self, calendar: &Tz) -> DateTime<Utc> {
        let local_birthday = self.birthday.with_timezone(calendar).naive_local();
        let months = Months::new(self.expected_lifespan_years.saturating_mul(12));
        let Some(local_end) = local_birthday.checked_add_months(months) else {
            return self.birthday;
        };

        calendar
            .from_local_datetime(&local_end)
            .earliest()
            .or_else(|| {
                local_end
                    .checked_add_signed(Duration::hours(1))
                    .and_then(|v| calendar.from_local_datetime(&v).earliest())
            })
            .map(|v| v.with_timezone(&Utc))
            .unwrap_or(self.birthday)
    }

    /// Time left until [Self::expected_end_date]. Negative once the end date has passed.
    pub fn remaining_duration(&self, now: DateTime<Utc>) -> Duration {
        self.remaining_duration_in(&Local, now)
    }

    pub fn remaining_duration_in<Tz: TimeZone>(
        &self,
        calendar: &Tz,
        now: DateTime<Utc>,
    ) -> Duration {
        self.expected_end_date_in(calendar) - now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_expired_in(&Local, now)
    }

    pub fn is_expired_in<Tz: TimeZone>(&self, calendar: &Tz, now: DateTime<Utc>) -> bool {
        self.remaining_duration_in(calendar, now) <= Duration::zero()
    }

    /// Per-tick shortcut used by the surfaces.
    pub fn breakdown_at(&self, now: DateTime<Utc>) -> Breakdown {
        self.breakdown_at_in(&Local, now)
    }

    pub fn breakdown_at_in<Tz: TimeZone>(&self, calendar: &Tz, now: DateTime<Utc>) -> Breakdown {
        Breakdown::from_duration(self.remaining_duration_in(calendar, now))
    }
}
