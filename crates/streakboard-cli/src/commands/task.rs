use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use streakboard_core::{Config, NewTask, Priority, TaskStatus, TaskUpdate};

use super::{open_service, print_json, today, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    List {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<String>,
    },
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Owning project id
        #[arg(long)]
        project: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        #[arg(long)]
        assigned_to: Option<String>,
        /// Due date (ISO-8601)
        #[arg(long)]
        due: Option<String>,
    },
    /// Move a task to in-progress
    Start { id: String },
    /// Mark a task completed
    Complete { id: String },
    /// Move a task back to pending
    Reopen { id: String },
    /// Delete a task
    Delete { id: String },
    /// Task counters
    Stats {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<String>,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load()?;
    let mut service = open_service(&config)?;
    let mut tasks = service.load_tasks()?;
    let now = Utc::now();

    let status_update = |status| TaskUpdate {
        status: Some(status),
        ..TaskUpdate::default()
    };

    // Only changes to completion touch the streak.
    let streak_changed = match action {
        TaskAction::List { project } => {
            match project {
                Some(id) => print_json(&tasks.for_project(&id).collect::<Vec<_>>())?,
                None => print_json(tasks.tasks())?,
            }
            return Ok(());
        }
        TaskAction::Stats { project } => {
            let stats = match project {
                Some(project_id) => tasks.stats_for_project(&project_id),
                None => tasks.stats(),
            };
            print_json(&stats)?;
            return Ok(());
        }
        TaskAction::Add {
            title,
            project,
            description,
            priority,
            assigned_to,
            due,
        } => {
            let task = tasks.add(
                NewTask {
                    project_id: project,
                    title,
                    description,
                    priority: priority.into(),
                    assigned_to,
                    due_date: due,
                },
                now,
            );
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
            false
        }
        TaskAction::Start { id } => {
            print_json(tasks.update(&id, status_update(TaskStatus::InProgress), now)?)?;
            true
        }
        TaskAction::Complete { id } => {
            print_json(tasks.complete(&id, now)?)?;
            true
        }
        TaskAction::Reopen { id } => {
            print_json(tasks.update(&id, status_update(TaskStatus::Pending), now)?)?;
            true
        }
        TaskAction::Delete { id } => {
            let task = tasks.delete(&id)?;
            eprintln!("Task deleted: {}", task.id);
            task.completed
        }
    };

    service.save_tasks(&tasks)?;
    if streak_changed {
        let outcome = service.refresh(today(), true)?;
        eprintln!(
            "Streak: {} current, {} longest",
            outcome.state.current_streak, outcome.state.longest_streak
        );
    }
    Ok(())
}
