//! Threshold grammar for the recency filter.
//!
//! Accepted forms:
//!
//! - RFC 3339 date-time (`2019-10-12T16:25:00Z`, `2019-10-12T18:25:00+02:00`)
//! - bare calendar date (`2019-10-12`), read as midnight UTC
//! - `<n><unit>` relative to now, with the units of `date(1)`:
//!   `S` seconds, `M` minutes, `H` hours, `d` days, `m` months, `Y` years
//!
//! Seconds, minutes and hours subtract a fixed duration. Days, months and
//! years step back on the calendar, so `1m` from March 31st lands on the
//! last day of February.
use chrono::{DateTime, Days, Months, NaiveDate, TimeDelta, Utc};
use thiserror::Error;

/// The threshold string could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unable to parse since threshold '{input}'")]
pub struct SinceError {
    pub input: String,
}

impl SinceError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Parses a threshold string into a point in time, relative to `now`.
///
/// # Errors
///
/// Returns [`SinceError`] for anything outside the grammar, including
/// relative amounts large enough to overflow the calendar.
pub fn parse_threshold(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, SinceError> {
    if let Some(threshold) = parse_relative(input, now)? {
        return Ok(threshold);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| SinceError::new(input))
}

/// `Ok(None)` means the input is not in relative form at all.
fn parse_relative(input: &str, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, SinceError> {
    let Some(unit) = input.chars().last() else {
        return Ok(None);
    };
    let digits = &input[..input.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let err = || SinceError::new(input);
    let amount: u32 = digits.parse().map_err(|_| err())?;

    let threshold = match unit {
        'S' => TimeDelta::try_seconds(i64::from(amount)).and_then(|d| now.checked_sub_signed(d)),
        'M' => TimeDelta::try_minutes(i64::from(amount)).and_then(|d| now.checked_sub_signed(d)),
        'H' => TimeDelta::try_hours(i64::from(amount)).and_then(|d| now.checked_sub_signed(d)),
        'd' => now.checked_sub_days(Days::new(u64::from(amount))),
        'm' => now.checked_sub_months(Months::new(amount)),
        'Y' => amount
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months))),
        _ => return Err(err()),
    };

    threshold.map(Some).ok_or_else(err)
}
