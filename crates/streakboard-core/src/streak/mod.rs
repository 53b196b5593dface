//! Completion streaks.
//!
//! - [`day`]: timestamp to calendar-day normalization
//! - [`engine`]: current/longest streak and reconciliation
//! - [`state`]: the persisted [`StreakState`]
//! - [`calendar`]: trailing dashboard window

pub mod calendar;
pub mod day;
pub mod engine;
pub mod state;

pub use calendar::{calendar_window, completion_ratio, CalendarDay, DEFAULT_CALENDAR_DAYS};
pub use day::{calendar_day, calendar_day_in, parse_day};
pub use engine::{
    calculate_current_streak, calculate_longest_streak, derive_completed_days,
    derive_completed_days_in, mark_day_completed, mark_day_completed_in, needs_refresh, reconcile,
    reconcile_in,
};
pub use state::StreakState;
