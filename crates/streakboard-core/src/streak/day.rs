//! Calendar-day normalization.
//!
//! Every timestamp that feeds a streak is truncated to a [`NaiveDate`] in a
//! single reference timezone. Three input shapes are accepted:
//!
//! - RFC 3339 with an offset (`2024-03-01T23:30:00Z`): converted into the
//!   reference timezone, then truncated.
//! - A naive date-time (`2024-03-01T23:30:00`): already wall-clock time, so
//!   the date part is taken as-is.
//! - A bare date (`2024-03-01`): taken as-is.
//!
//! Anything else yields `None` and contributes nothing to a streak.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::ValidationError;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Truncate `raw` to a calendar day in `tz`.
pub fn calendar_day_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).date_naive());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Truncate `raw` to a calendar day in the local timezone.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    calendar_day_in(raw, &Local)
}

/// Parse a strict `YYYY-MM-DD` day, as typed on the command line.
pub fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// The day after `day`, `None` at the calendar's upper bound.
pub(crate) fn next_day(day: NaiveDate) -> Option<NaiveDate> {
    day.succ_opt()
}

/// The day before `day`, `None` at the calendar's lower bound.
pub(crate) fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.pred_opt()
}
