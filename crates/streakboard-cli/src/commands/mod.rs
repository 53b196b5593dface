pub mod config;
pub mod project;
pub mod streak;
pub mod task;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use streakboard_core::{Config, JsonFileStore, StreakService};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Service over the configured JSON store.
pub fn open_service(
    config: &Config,
) -> Result<StreakService<JsonFileStore>, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open(config.store_path()?)?;
    Ok(StreakService::new(store))
}

/// The local calendar day, read once per invocation.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
