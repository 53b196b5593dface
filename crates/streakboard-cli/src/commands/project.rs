use chrono::Utc;
use clap::Subcommand;
use streakboard_core::{Config, NewProject};

use super::task::PriorityArg;
use super::{open_service, print_json, today, CliResult};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects
    List,
    /// Create a new project
    Add {
        /// Project name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        /// Due date (ISO-8601)
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a project and all of its tasks
    Delete { id: String },
}

pub fn run(action: ProjectAction) -> CliResult {
    let config = Config::load()?;
    let mut service = open_service(&config)?;
    let mut projects = service.load_projects()?;

    match action {
        ProjectAction::List => {
            print_json(projects.projects())?;
        }
        ProjectAction::Add {
            name,
            description,
            priority,
            due,
        } => {
            let project = projects.add(
                NewProject {
                    name,
                    description,
                    priority: priority.into(),
                    due_date: due,
                    ..NewProject::default()
                },
                Utc::now(),
            )?;
            service.save_projects(&projects)?;
            eprintln!("Project created: {}", project.id);
            print_json(&project)?;
        }
        ProjectAction::Delete { id } => {
            let project = projects.delete(&id)?;
            let mut tasks = service.load_tasks()?;
            let removed = tasks.delete_project_tasks(&project.id);
            service.save_projects(&projects)?;
            service.save_tasks(&tasks)?;
            if removed > 0 {
                service.refresh(today(), true)?;
            }
            eprintln!("Project deleted: {} ({removed} tasks removed)", project.id);
        }
    }
    Ok(())
}
