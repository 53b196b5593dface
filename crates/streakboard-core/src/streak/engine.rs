//! Streak engine.
//!
//! Pure functions from task records and prior state to new [`StreakState`]
//! values. Nothing here reads the clock or touches storage: `today` is
//! always passed in.
//!
//! ## Current-streak rule
//! A run is alive only if it touches `today` or `today - 1`. The count
//! anchors on `today` when present, otherwise on yesterday, and walks
//! backward until the first missing day. A most-recent-day anchor (counting
//! from the latest completion no matter how old) is not supported.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate, TimeZone};

use super::day::{next_day, previous_day};
use super::state::StreakState;
use crate::task::Task;

/// Distinct calendar days, in `tz`, on which at least one task was completed.
pub fn derive_completed_days_in<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> BTreeSet<NaiveDate> {
    tasks.iter().filter_map(|t| t.completion_day_in(tz)).collect()
}

/// [`derive_completed_days_in`] in the local timezone.
pub fn derive_completed_days(tasks: &[Task]) -> BTreeSet<NaiveDate> {
    derive_completed_days_in(tasks, &Local)
}

/// Consecutive completed days ending at `today` or yesterday.
///
/// Returns 0 when neither `today` nor `today - 1` is in `days`.
pub fn calculate_current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let anchor = if days.contains(&today) {
        today
    } else {
        match previous_day(today) {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut cursor = Some(anchor);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = previous_day(day);
    }
    streak
}

/// Longest run of consecutive days anywhere in `days`.
pub fn calculate_longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut iter = days.iter().copied();
    let Some(first) = iter.next() else {
        return 0;
    };

    let mut longest = 1;
    let mut run = 1;
    let mut prev = first;
    for day in iter {
        if next_day(prev) == Some(day) {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
        prev = day;
    }
    longest.max(run)
}

/// Whether `previous` is stale relative to `today`.
///
/// Recomputing a fresh state is harmless; callers use this to skip work.
pub fn needs_refresh(previous: &StreakState, today: NaiveDate) -> bool {
    previous.last_updated != Some(today)
}

/// Recompute streak state from `tasks`, with days taken in `tz`.
///
/// Days marked by hand in `previous` survive alongside the task-derived
/// days. `longest_streak` never drops below `previous.longest_streak`, so
/// pruning old tasks does not erase a record.
pub fn reconcile_in<Tz: TimeZone>(
    tasks: &[Task],
    previous: &StreakState,
    today: NaiveDate,
    tz: &Tz,
) -> StreakState {
    let derived = derive_completed_days_in(tasks, tz);
    from_days(derived, previous.manual_days.clone(), previous, today)
}

/// [`reconcile_in`] in the local timezone.
pub fn reconcile(tasks: &[Task], previous: &StreakState, today: NaiveDate) -> StreakState {
    reconcile_in(tasks, previous, today, &Local)
}

/// Record a completion on `day` without a backing task, then reconcile
/// against `tasks` in `tz`.
///
/// The day is kept as a manual day, so later reconciliations keep it too.
/// Marking a day already on record leaves the counters unchanged apart from
/// `last_updated`.
pub fn mark_day_completed_in<Tz: TimeZone>(
    tasks: &[Task],
    previous: &StreakState,
    day: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
) -> StreakState {
    let mut manual_days = previous.manual_days.clone();
    manual_days.insert(day);
    from_days(derive_completed_days_in(tasks, tz), manual_days, previous, today)
}

/// [`mark_day_completed_in`] in the local timezone.
pub fn mark_day_completed(
    tasks: &[Task],
    previous: &StreakState,
    day: NaiveDate,
    today: NaiveDate,
) -> StreakState {
    mark_day_completed_in(tasks, previous, day, today, &Local)
}

fn from_days(
    derived: BTreeSet<NaiveDate>,
    manual_days: BTreeSet<NaiveDate>,
    previous: &StreakState,
    today: NaiveDate,
) -> StreakState {
    let mut completed_days = derived;
    completed_days.extend(manual_days.iter().copied());
    let current_streak = calculate_current_streak(&completed_days, today);
    let longest_streak = previous
        .longest_streak
        .max(calculate_longest_streak(&completed_days));

    StreakState {
        current_streak,
        longest_streak,
        last_updated: Some(today),
        completed_days,
        manual_days,
    }
}
