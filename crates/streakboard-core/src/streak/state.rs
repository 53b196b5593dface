//! Persisted streak state.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::day::calendar_day;

/// Streak counters plus the completed-day history they were derived from.
///
/// Owned by the storage layer; the engine only ever returns fresh values.
/// Serialized in camelCase under the `streak_data` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredStreakState")]
pub struct StreakState {
    /// Consecutive days ending today or yesterday.
    pub current_streak: u32,
    /// Best run ever observed; never decreases.
    pub longest_streak: u32,
    /// Day of the last recomputation.
    pub last_updated: Option<NaiveDate>,
    /// Distinct days with at least one completion, from tasks or marks.
    pub completed_days: BTreeSet<NaiveDate>,
    /// Days marked completed directly, without a backing task. Always a
    /// subset of `completed_days`; reconciliation keeps them.
    pub manual_days: BTreeSet<NaiveDate>,
}

/// On-disk shape, tolerant of what older stores wrote.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStreakState {
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    longest_streak: u32,
    #[serde(default, deserialize_with = "lenient_day")]
    last_updated: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_days")]
    completed_days: BTreeSet<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_optional_days")]
    manual_days: Option<BTreeSet<NaiveDate>>,
}

impl From<StoredStreakState> for StreakState {
    fn from(stored: StoredStreakState) -> Self {
        // Stores without `manualDays` predate task-derived days: every
        // completed day there was marked by hand.
        let manual_days = stored
            .manual_days
            .unwrap_or_else(|| stored.completed_days.clone());
        let mut completed_days = stored.completed_days;
        completed_days.extend(manual_days.iter().copied());
        Self {
            current_streak: stored.current_streak,
            longest_streak: stored.longest_streak,
            last_updated: stored.last_updated,
            completed_days,
            manual_days,
        }
    }
}

fn parse_days(raw: Vec<serde_json::Value>) -> BTreeSet<NaiveDate> {
    raw.iter()
        .filter_map(|v| v.as_str().and_then(calendar_day))
        .collect()
}

// Older stores persisted full ISO timestamps (midnight local) instead of
// plain dates, and occasionally junk. Unparseable entries are dropped.
fn lenient_days<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(parse_days(raw.unwrap_or_default()))
}

fn lenient_optional_days<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeSet<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(parse_days))
}

fn lenient_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(calendar_day))
}
