//! Storage port and its backends.
//!
//! Everything the tracker persists is a JSON value under a stable key, the
//! same shape the browser build kept in local storage. The engine never sees
//! this layer; [`crate::service::StreakService`] does the read-modify-write.

mod config;
mod json_file;
mod memory;

pub use config::{Config, LoggingConfig, StorageConfig, StreakConfig};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Key holding the task list.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the project list.
pub const PROJECTS_KEY: &str = "projects";
/// Key holding the persisted [`crate::StreakState`].
pub const STREAK_DATA_KEY: &str = "streak_data";

/// A minimal key-value store of JSON values.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Drop `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Read and deserialize `key`.
pub fn get_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize and write `value` under `key`.
pub fn set_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, serde_json::to_value(value)?)
}

/// Resolves the data directory without touching the filesystem.
///
/// `STREAKBOARD_HOME` wins when set. Otherwise `~/.config/streakboard/`, or
/// `~/.config/streakboard-dev/` with `STREAKBOARD_ENV=dev`.
pub fn data_dir_path() -> PathBuf {
    match std::env::var_os("STREAKBOARD_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STREAKBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("streakboard-dev")
            } else {
                base_dir.join("streakboard")
            }
        }
    }
}

/// Returns the data directory, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = data_dir_path();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
