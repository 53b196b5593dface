use clap::Subcommand;
use serde::Serialize;
use streakboard_core::streak::{calendar_window, completion_ratio, parse_day, CalendarDay};
use streakboard_core::Config;

use super::{open_service, print_json, today, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the stored streak state as-is
    Show,
    /// Reconcile the streak against stored tasks
    Refresh {
        /// Recompute even if already refreshed today
        #[arg(long)]
        force: bool,
    },
    /// Record a completed day without a task
    Mark {
        /// Day to mark (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Reset streak state to defaults
    Reset,
    /// Show the trailing completion calendar
    Calendar {
        /// Number of days (default from config)
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarView {
    current_streak: u32,
    longest_streak: u32,
    completion_ratio: f64,
    days: Vec<CalendarDay>,
}

pub fn run(action: StreakAction) -> CliResult {
    let config = Config::load()?;
    let mut service = open_service(&config)?;
    let today = today();

    match action {
        StreakAction::Show => {
            print_json(&service.load_state()?)?;
        }
        StreakAction::Refresh { force } => {
            let force = force || !config.streak.skip_same_day_refresh;
            let outcome = service.refresh(today, force)?;
            print_json(&outcome)?;
        }
        StreakAction::Mark { date } => {
            let day = match date {
                Some(raw) => parse_day(&raw)?,
                None => today,
            };
            print_json(&service.mark_day_completed(day, today)?)?;
        }
        StreakAction::Reset => {
            service.reset()?;
            eprintln!("streak state reset");
        }
        StreakAction::Calendar { days } => {
            let len = days.unwrap_or(config.streak.calendar_days);
            let state = service
                .refresh(today, !config.streak.skip_same_day_refresh)?
                .state;
            let window = calendar_window(&state.completed_days, today, len);
            print_json(&CalendarView {
                current_streak: state.current_streak,
                longest_streak: state.longest_streak,
                completion_ratio: completion_ratio(&window),
                days: window,
            })?;
        }
    }
    Ok(())
}
