use std::fmt::Display;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_english::parse_date_string;
use clap::ValueEnum;
use now::DateTimeNow;

use crate::{
    timer::TimerRecord,
    utils::time::{local_day_start, years_before},
};

pub const MIN_LIFESPAN_YEARS: u32 = 30;
pub const MAX_LIFESPAN_YEARS: u32 = 120;
pub const DEFAULT_LIFESPAN_YEARS: u32 = 80;
/// Oldest birthday accepted, counted back from today.
pub const MAX_AGE_YEARS: u32 = 120;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Reads a birthday typed by the user. `YYYY-MM-DD` is tried first, anything else goes through
/// chrono-english using `date_style` to order day and month. The result is the local start of
/// that day.
pub fn parse_birthday(
    input: &str,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let day_start = match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => local_day_start(date)
            .ok_or_else(|| anyhow!("{date} has no valid local start of day"))?,
        Err(_) => parse_date_string(input, now, date_style.into())
            .map_err(|e| anyhow!("Can't read {input:?} as a date: {e}"))?
            .beginning_of_day(),
    };
    Ok(day_start.with_timezone(&Utc))
}

/// Applies the setup form limits (lifespan 30..=120, birthday within the last 120 years) and builds
/// the record to save.
pub fn validate_setup(
    birthday: DateTime<Utc>,
    expected_lifespan_years: u32,
    now: DateTime<Utc>,
) -> Result<TimerRecord> {
    if !(MIN_LIFESPAN_YEARS..=MAX_LIFESPAN_YEARS).contains(&expected_lifespan_years) {
        bail!(
            "Expected lifespan must be between {MIN_LIFESPAN_YEARS} and {MAX_LIFESPAN_YEARS} years, got {expected_lifespan_years}"
        );
    }
    if birthday > now {
        bail!("Birthday can't be in the future");
    }
    let oldest = years_before(now, MAX_AGE_YEARS)
        .ok_or_else(|| anyhow!("Can't compute a date {MAX_AGE_YEARS} years before {now}"))?;
    if birthday < oldest {
        bail!("Birthday can't be more than {MAX_AGE_YEARS} years ago");
    }
    Ok(TimerRecord::new(birthday, expected_lifespan_years))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};

    use crate::utils::time::local_day_start;

    use super::{parse_birthday, validate_setup, DateStyle};

    fn expected(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
        local_day_start(NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_parse_iso_birthday() {
        let parsed = parse_birthday(" 1990-03-15 ", DateStyle::Uk, Local::now()).unwrap();
        assert_eq!(parsed, expected(1990, 3, 15));
    }

    #[test]
    fn test_parse_birthday_dialects() {
        let uk = parse_birthday("15/03/1990", DateStyle::Uk, Local::now()).unwrap();
        let us = parse_birthday("03/15/1990", DateStyle::Us, Local::now()).unwrap();
        assert_eq!(uk, expected(1990, 3, 15));
        assert_eq!(us, uk);
    }

    #[test]
    fn test_parse_birthday_rejects_garbage() {
        assert!(parse_birthday("the day after never", DateStyle::Uk, Local::now()).is_err());
    }

    #[test]
    fn test_lifespan_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let birthday = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();

        assert!(validate_setup(birthday, 29, now).is_err());
        assert!(validate_setup(birthday, 121, now).is_err());
        assert_eq!(
            validate_setup(birthday, 30, now).unwrap().expected_lifespan_years(),
            30
        );
        assert_eq!(
            validate_setup(birthday, 120, now).unwrap().expected_lifespan_years(),
            120
        );
    }

    #[test]
    fn test_birthday_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        assert!(validate_setup(now + Duration::seconds(1), 80, now).is_err());
        assert!(validate_setup(now, 80, now).is_ok());

        let oldest = Utc.with_ymd_and_hms(1905, 6, 1, 12, 0, 0).unwrap();
        assert!(validate_setup(oldest, 80, now).is_ok());
        assert!(validate_setup(oldest - Duration::seconds(1), 80, now).is_err());
    }

    #[test]
    fn test_validated_record_keeps_input() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let birthday = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let record = validate_setup(birthday, 80, now).unwrap();
        assert_eq!(record.birthday(), birthday);
        assert_eq!(
            record.expected_end_date(),
            Utc.with_ymd_and_hms(2080, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
