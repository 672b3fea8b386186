use chrono::{DateTime, Local, Months, NaiveDate, TimeZone, Utc};
use now::DateTimeNow;

/// Local midnight of `date`. Anchoring on noon first keeps days whose midnight falls into a
/// DST gap resolvable.
pub fn local_day_start(date: NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_hms_opt(12, 0, 0)?)
        .earliest()
        .map(|v| v.beginning_of_day())
}

/// `moment` moved back by whole calendar years, clamping Feb 29 like the timer does going forward.
pub fn years_before(moment: DateTime<Utc>, years: u32) -> Option<DateTime<Utc>> {
    moment.checked_sub_months(Months::new(years.checked_mul(12)?))
}

/// Birthday as shown to the user, in their local calendar. For example `Mar 15, 1990`.
pub fn format_birthday(birthday: DateTime<Utc>) -> String {
    birthday.with_timezone(&Local).format("%b %-d, %Y").to_string()
}
