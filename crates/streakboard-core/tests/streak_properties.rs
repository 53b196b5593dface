//! Property tests for the streak engine.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use streakboard_core::streak::{
    calculate_current_streak, calculate_longest_streak, derive_completed_days_in,
    mark_day_completed_in, reconcile_in,
};
use streakboard_core::{StreakState, Task};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// (day offset, hour, completed) triples turned into task records.
fn tasks_from(specs: &[(i64, u32, bool)]) -> Vec<Task> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(offset, hour, completed))| {
            let day = base() + Duration::days(offset);
            let at = format!("{}T{:02}:15:00Z", day, hour);
            let task = Task::new(i.to_string(), at);
            if completed {
                task.completed()
            } else {
                task
            }
        })
        .collect()
}

fn task_specs() -> impl Strategy<Value = Vec<(i64, u32, bool)>> {
    prop::collection::vec((0i64..60, 0u32..24, any::<bool>()), 0..40)
}

proptest! {
    #[test]
    fn reconcile_is_idempotent(specs in task_specs(), today_offset in 0i64..70) {
        let tasks = tasks_from(&specs);
        let today = base() + Duration::days(today_offset);
        let once = reconcile_in(&tasks, &StreakState::default(), today, &Utc);
        let twice = reconcile_in(&tasks, &StreakState::default(), today, &Utc);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(reconcile_in(&tasks, &once, today, &Utc), once);
    }

    #[test]
    fn longest_never_regresses(
        batches in prop::collection::vec(task_specs(), 1..6),
        today_offset in 0i64..70,
    ) {
        let today = base() + Duration::days(today_offset);
        let mut state = StreakState::default();
        for specs in &batches {
            let next = reconcile_in(&tasks_from(specs), &state, today, &Utc);
            prop_assert!(next.longest_streak >= state.longest_streak);
            state = next;
        }
    }

    #[test]
    fn current_is_bounded_by_longest(specs in task_specs(), today_offset in 0i64..70) {
        let days = derive_completed_days_in(&tasks_from(&specs), &Utc);
        let today = base() + Duration::days(today_offset);
        let current = calculate_current_streak(&days, today);
        prop_assert!(current <= calculate_longest_streak(&days));
        prop_assert!(calculate_longest_streak(&days) as usize <= days.len());
    }

    #[test]
    fn derived_days_are_the_distinct_completed_days(specs in task_specs()) {
        let days = derive_completed_days_in(&tasks_from(&specs), &Utc);
        let expected: BTreeSet<NaiveDate> = specs
            .iter()
            .filter(|(_, _, completed)| *completed)
            .map(|(offset, _, _)| base() + Duration::days(*offset))
            .collect();
        prop_assert_eq!(days, expected);
    }

    #[test]
    fn marked_days_survive_reconcile(
        specs in task_specs(),
        marks in prop::collection::vec(0i64..60, 1..5),
        today_offset in 0i64..70,
    ) {
        let tasks = tasks_from(&specs);
        let today = base() + Duration::days(today_offset);
        let mut state = StreakState::default();
        for offset in &marks {
            let day = base() + Duration::days(*offset);
            state = mark_day_completed_in(&tasks, &state, day, today, &Utc);
        }

        let later = reconcile_in(&[], &state, today + Duration::days(1), &Utc);
        for offset in &marks {
            let day = base() + Duration::days(*offset);
            prop_assert!(later.completed_days.contains(&day));
        }
        prop_assert!(later.manual_days.is_subset(&later.completed_days));
        prop_assert!(later.longest_streak >= state.longest_streak);
    }
}
