//! Projects that group tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::task::{timestamp, Priority};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
}

/// A project as persisted under the `projects` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectList {
    projects: Vec<Project>,
}

impl ProjectList {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Append a new project and return a copy of it.
    ///
    /// # Errors
    /// Returns an error if the name is blank.
    pub fn add(&mut self, new: NewProject, now: DateTime<Utc>) -> Result<Project, ValidationError> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "project name must not be empty".into(),
            });
        }
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            status: new.status,
            priority: new.priority,
            created_at: timestamp(now),
            due_date: new.due_date,
        };
        self.projects.push(project.clone());
        Ok(project)
    }

    pub fn update(&mut self, id: &str, update: ProjectUpdate) -> Result<&Project, ValidationError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(priority) = update.priority {
            project.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            project.due_date = Some(due_date);
        }
        Ok(&*project)
    }

    /// Remove the project with `id`. Its tasks are the caller's to cascade.
    pub fn delete(&mut self, id: &str) -> Result<Project, ValidationError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.projects.remove(idx))
    }
}

fn not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind: "project",
        id: id.to_string(),
    }
}
