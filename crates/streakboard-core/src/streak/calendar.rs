//! Trailing calendar window for the streak dashboard.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Default window: five weeks.
pub const DEFAULT_CALENDAR_DAYS: u32 = 35;

/// One cell of the streak calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub completed: bool,
    pub is_today: bool,
}

/// `len` consecutive days ending at `today`, oldest first.
pub fn calendar_window(days: &BTreeSet<NaiveDate>, today: NaiveDate, len: u32) -> Vec<CalendarDay> {
    (0..i64::from(len))
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset)))
        .map(|date| CalendarDay {
            date,
            weekday: date.weekday(),
            completed: days.contains(&date),
            is_today: date == today,
        })
        .collect()
}

/// Completed days inside the window, out of its length.
pub fn completion_ratio(window: &[CalendarDay]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let done = window.iter().filter(|d| d.completed).count();
    done as f64 / window.len() as f64
}
