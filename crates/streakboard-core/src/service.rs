//! Streak reconciliation against a key-value store.
//!
//! [`StreakService`] is the only place that both reads stored state and
//! runs the engine. Each operation is one read-modify-write on the store;
//! there is a single writer, so no locking is involved.
//!
//! ## Usage
//! ```rust,ignore
//! use streakboard_core::{MemoryStore, StreakService};
//!
//! let mut service = StreakService::new(MemoryStore::new());
//! let outcome = service.refresh(today, false)?;
//! println!("current streak: {}", outcome.state.current_streak);
//! ```

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::project::ProjectList;
use crate::storage::{get_json, set_json, KeyValueStore, PROJECTS_KEY, STREAK_DATA_KEY, TASKS_KEY};
use crate::streak::{self, StreakState};
use crate::task::TaskList;

/// Result of [`StreakService::refresh`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub state: StreakState,
    /// False when the stored state was already from today and was returned as-is.
    pub recomputed: bool,
}

/// Reads tasks and streak state through `S`, writes updated state back.
pub struct StreakService<S, Tz = Local>
where
    Tz: TimeZone,
{
    store: S,
    tz: Tz,
}

impl<S: KeyValueStore> StreakService<S, Local> {
    /// Service attributing completions to local calendar days.
    pub fn new(store: S) -> Self {
        Self { store, tz: Local }
    }
}

impl<S: KeyValueStore, Tz: TimeZone> StreakService<S, Tz> {
    /// Service attributing completions to calendar days in `tz`.
    pub fn with_timezone(store: S, tz: Tz) -> Self {
        Self { store, tz }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Stored streak state, defaulting when absent.
    pub fn load_state(&self) -> Result<StreakState> {
        Ok(get_json(&self.store, STREAK_DATA_KEY)?.unwrap_or_default())
    }

    pub fn save_state(&mut self, state: &StreakState) -> Result<()> {
        set_json(&mut self.store, STREAK_DATA_KEY, state)
    }

    /// Stored tasks, empty when absent.
    pub fn load_tasks(&self) -> Result<TaskList> {
        Ok(get_json(&self.store, TASKS_KEY)?.unwrap_or_default())
    }

    pub fn save_tasks(&mut self, tasks: &TaskList) -> Result<()> {
        set_json(&mut self.store, TASKS_KEY, tasks)
    }

    /// Stored projects, empty when absent.
    pub fn load_projects(&self) -> Result<ProjectList> {
        Ok(get_json(&self.store, PROJECTS_KEY)?.unwrap_or_default())
    }

    pub fn save_projects(&mut self, projects: &ProjectList) -> Result<()> {
        set_json(&mut self.store, PROJECTS_KEY, projects)
    }

    /// Reconcile stored state against stored tasks as of `today`.
    ///
    /// When the stored state is already from `today` it is returned without
    /// recomputation, unless `force` is set.
    pub fn refresh(&mut self, today: NaiveDate, force: bool) -> Result<RefreshOutcome> {
        let previous = self.load_state()?;
        if !force && !streak::needs_refresh(&previous, today) {
            tracing::debug!(%today, "streak state already current");
            return Ok(RefreshOutcome {
                state: previous,
                recomputed: false,
            });
        }

        let tasks = self.load_tasks()?;
        let state = streak::reconcile_in(tasks.tasks(), &previous, today, &self.tz);
        self.save_state(&state)?;
        tracing::info!(
            %today,
            tasks = tasks.len(),
            days = state.completed_days.len(),
            current = state.current_streak,
            longest = state.longest_streak,
            "reconciled streak state"
        );
        Ok(RefreshOutcome {
            state,
            recomputed: true,
        })
    }

    /// Record a completion on `day` without a backing task.
    ///
    /// The result is reconciled against stored tasks, and the day is kept
    /// through later refreshes.
    pub fn mark_day_completed(&mut self, day: NaiveDate, today: NaiveDate) -> Result<StreakState> {
        let previous = self.load_state()?;
        let tasks = self.load_tasks()?;
        let state = streak::mark_day_completed_in(tasks.tasks(), &previous, day, today, &self.tz);
        self.save_state(&state)?;
        tracing::info!(%day, current = state.current_streak, "marked day completed");
        Ok(state)
    }

    /// Overwrite stored state with defaults.
    pub fn reset(&mut self) -> Result<StreakState> {
        let state = StreakState::default();
        self.save_state(&state)?;
        tracing::info!("streak state reset");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::task::Task;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn service_with(tasks: Vec<Task>) -> StreakService<MemoryStore, Utc> {
        let mut service = StreakService::with_timezone(MemoryStore::new(), Utc);
        service.save_tasks(&TaskList::new(tasks)).unwrap();
        service
    }

    #[test]
    fn absent_state_loads_as_default() {
        let service = StreakService::with_timezone(MemoryStore::new(), Utc);
        assert_eq!(service.load_state().unwrap(), StreakState::default());
        assert!(service.load_tasks().unwrap().is_empty());
        assert!(service.load_projects().unwrap().projects().is_empty());
    }

    #[test]
    fn refresh_persists_and_then_skips_same_day() {
        let mut service = service_with(vec![
            Task::new("1", "2024-03-09T10:00:00Z").completed(),
            Task::new("2", "2024-03-10T10:00:00Z").completed(),
        ]);

        let first = service.refresh(today(), false).unwrap();
        assert!(first.recomputed);
        assert_eq!(first.state.current_streak, 2);
        assert_eq!(service.load_state().unwrap(), first.state);

        // New completions on the same day are picked up only when forced.
        let mut tasks = service.load_tasks().unwrap().into_inner();
        tasks.push(Task::new("3", "2024-03-08T10:00:00Z").completed());
        service.save_tasks(&TaskList::new(tasks)).unwrap();

        let skipped = service.refresh(today(), false).unwrap();
        assert!(!skipped.recomputed);
        assert_eq!(skipped.state.current_streak, 2);

        let forced = service.refresh(today(), true).unwrap();
        assert!(forced.recomputed);
        assert_eq!(forced.state.current_streak, 3);
    }

    #[test]
    fn mark_and_reset() {
        let mut service = service_with(Vec::new());
        let state = service.mark_day_completed(today(), today()).unwrap();
        assert_eq!(state.current_streak, 1);
        assert_eq!(service.load_state().unwrap().longest_streak, 1);

        service.reset().unwrap();
        assert_eq!(service.load_state().unwrap(), StreakState::default());
    }

    #[test]
    fn marked_day_is_kept_by_the_next_day_refresh() {
        let mut service = service_with(vec![Task::new("1", "2024-03-09T10:00:00Z").completed()]);
        service.refresh(today() - chrono::Duration::days(1), false).unwrap();

        let marked = service.mark_day_completed(today(), today()).unwrap();
        assert_eq!(marked.current_streak, 2);

        let next = service.refresh(today() + chrono::Duration::days(1), false).unwrap();
        assert!(next.recomputed);
        assert!(next.state.completed_days.contains(&today()));
        assert_eq!(next.state.current_streak, 2);
        assert_eq!(next.state.longest_streak, 2);
    }

    #[test]
    fn mark_reconciles_against_stored_tasks() {
        let mut service = service_with(Vec::new());
        service.refresh(today(), false).unwrap();
        service
            .save_tasks(&TaskList::new(vec![Task::new("1", "2024-03-09T10:00:00Z").completed()]))
            .unwrap();

        let state = service.mark_day_completed(today(), today()).unwrap();
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.completed_days.len(), 2);
    }

    #[test]
    fn corrupt_state_surfaces_as_error() {
        let mut store = MemoryStore::new();
        store
            .set(STREAK_DATA_KEY, serde_json::json!({"currentStreak": "lots"}))
            .unwrap();
        let service = StreakService::with_timezone(store, Utc);
        assert!(service.load_state().is_err());
    }
}
