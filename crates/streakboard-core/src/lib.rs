//! # Streakboard Core Library
//!
//! Core logic for the Streakboard task tracker: task and project records,
//! and the completion-streak engine that turns them into daily streaks.
//! The `streakboard` CLI is a thin surface over this crate.
//!
//! ## Architecture
//!
//! - **Streak engine**: pure functions over calendar days. `today` is always
//!   an argument, never read from the clock.
//! - **Storage**: a [`KeyValueStore`] port of JSON values with in-memory and
//!   single-file backends, plus TOML configuration
//! - **Service**: [`StreakService`] performs the read-reconcile-write cycle
//!
//! ## Key Components
//!
//! - [`reconcile`]: recompute [`StreakState`] from a task list
//! - [`TaskList`] / [`ProjectList`]: board list operations
//! - [`JsonFileStore`]: file-backed store
//! - [`Config`]: application configuration management

pub mod error;
pub mod project;
pub mod service;
pub mod storage;
pub mod streak;
pub mod task;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use project::{NewProject, Project, ProjectList, ProjectStatus, ProjectUpdate};
pub use service::{RefreshOutcome, StreakService};
pub use storage::{Config, JsonFileStore, KeyValueStore, MemoryStore};
pub use streak::{
    calculate_current_streak, calculate_longest_streak, calendar_window, derive_completed_days,
    mark_day_completed, reconcile, CalendarDay, StreakState,
};
pub use task::{NewTask, Priority, Task, TaskList, TaskStats, TaskStatus, TaskUpdate};
