//! Task records and the in-memory task list.
//!
//! Timestamps stay as the raw strings found in storage. A task whose dates
//! fail to parse is still a valid record; it just never lands on a streak day.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::streak::day::calendar_day_in;

/// Workflow status shown on the task board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Priority label shared by tasks and projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task as persisted under the `tasks` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// The only flag the streak engine reads.
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Task {
    /// Minimal record used by tests and imports.
    pub fn new(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assigned_to: None,
            completed: false,
            completed_at: None,
            created_at: created_at.into(),
            due_date: None,
        }
    }

    /// Mark as completed at `completed_at` (builder style).
    pub fn completed_at(mut self, completed_at: impl Into<String>) -> Self {
        self.completed = true;
        self.status = TaskStatus::Completed;
        self.completed_at = Some(completed_at.into());
        self
    }

    /// Mark as completed without a completion timestamp (builder style).
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self.status = TaskStatus::Completed;
        self
    }

    /// Calendar day this task contributes to a streak, in `tz`.
    ///
    /// `None` unless `completed` is set. Uses `completedAt` when present,
    /// otherwise `createdAt`; a present but malformed `completedAt` does not
    /// fall back.
    pub fn completion_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        if !self.completed {
            return None;
        }
        let raw = self.completed_at.as_deref().unwrap_or(&self.created_at);
        calendar_day_in(raw, tz)
    }

    /// [`Task::completion_day_in`] in the local timezone.
    pub fn completion_day(&self) -> Option<NaiveDate> {
        self.completion_day_in(&Local)
    }

    fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        match status {
            TaskStatus::Completed if !self.completed => {
                self.completed = true;
                self.completed_at = Some(timestamp(now));
            }
            TaskStatus::Completed => {}
            _ => {
                self.completed = false;
                self.completed_at = None;
            }
        }
        self.status = status;
    }
}

/// Fields supplied when creating a task. Id and `createdAt` are assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Completed share of `total` as a whole percentage, rounded half up;
    /// 0 when there are no tasks.
    pub completion_rate: u32,
}

impl TaskStats {
    fn collect<'a>(tasks: impl Iterator<Item = &'a Task>) -> Self {
        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            let rate = (stats.completed * 100 + stats.total / 2) / stats.total;
            stats.completion_rate = u32::try_from(rate).unwrap_or(100);
        }
        stats
    }
}

/// Ordered task collection with the board's list operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_inner(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks belonging to `project_id`.
    pub fn for_project<'a>(
        &'a self,
        project_id: &'a str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.project_id.as_deref() == Some(project_id))
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a new task and return a copy of it.
    pub fn add(&mut self, new: NewTask, now: DateTime<Utc>) -> Task {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            status: TaskStatus::Pending,
            priority: new.priority,
            assigned_to: new.assigned_to,
            completed: false,
            completed_at: None,
            created_at: timestamp(now),
            due_date: new.due_date,
        };
        self.tasks.push(task.clone());
        task
    }

    /// Apply `update` to the task with `id`.
    ///
    /// Moving to `completed` stamps `completedAt` with `now`; moving away
    /// clears both the flag and the stamp.
    pub fn update(
        &mut self,
        id: &str,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<&Task, ValidationError> {
        let task = self.get_mut(id)?;
        if let Some(project_id) = update.project_id {
            task.project_id = Some(project_id);
        }
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(due_date) = update.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(status) = update.status {
            task.set_status(status, now);
        }
        Ok(&*task)
    }

    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<&Task, ValidationError> {
        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..TaskUpdate::default()
        };
        self.update(id, update, now)
    }

    /// Remove the task with `id`, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Task, ValidationError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.tasks.remove(idx))
    }

    /// Remove every task of `project_id`; returns how many were removed.
    pub fn delete_project_tasks(&mut self, project_id: &str) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.project_id.as_deref() != Some(project_id));
        before - self.tasks.len()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::collect(self.tasks.iter())
    }

    /// Counters over the tasks of `project_id` only.
    pub fn stats_for_project(&self, project_id: &str) -> TaskStats {
        TaskStats::collect(self.for_project(project_id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind: "task",
        id: id.to_string(),
    }
}

pub(crate) fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone as _};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn board() -> TaskList {
        let mut list = TaskList::default();
        for (title, project) in [("wireframes", "1"), ("frontend", "1"), ("api spec", "2")] {
            list.add(
                NewTask {
                    project_id: Some(project.into()),
                    title: title.into(),
                    ..NewTask::default()
                },
                now(),
            );
        }
        list
    }

    #[test]
    fn completion_day_prefers_completed_at() {
        let task = Task::new("1", "2024-03-01T10:00:00Z").completed_at("2024-03-04T10:00:00Z");
        assert_eq!(task.completion_day_in(&Utc), Some(d(2024, 3, 4)));

        let task = Task::new("2", "2024-03-01T10:00:00Z").completed();
        assert_eq!(task.completion_day_in(&Utc), Some(d(2024, 3, 1)));
    }

    #[test]
    fn incomplete_or_malformed_tasks_have_no_day() {
        let task = Task::new("1", "2024-03-01T10:00:00Z");
        assert_eq!(task.completion_day_in(&Utc), None);

        let task = Task::new("2", "2024-03-01T10:00:00Z").completed_at("soon");
        assert_eq!(task.completion_day_in(&Utc), None);

        let task = Task::new("3", "").completed();
        assert_eq!(task.completion_day_in(&Utc), None);
    }

    #[test]
    fn completion_day_respects_timezone() {
        let task = Task::new("1", "2024-03-01T23:30:00Z").completed();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(task.completion_day_in(&plus_two), Some(d(2024, 3, 2)));
    }

    #[test]
    fn deserializes_original_board_records() {
        let json = r#"{
            "id": "101",
            "projectId": "1",
            "title": "Create wireframes",
            "status": "completed",
            "priority": "high",
            "assignedTo": "Jane Doe",
            "createdAt": "2023-05-15T10:00:00Z",
            "dueDate": "2023-05-25T23:59:59Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);
        assert_eq!(task.completion_day(), None);
    }

    #[test]
    fn add_assigns_id_and_created_at() {
        let list = board();
        assert_eq!(list.len(), 3);
        let task = &list.tasks()[0];
        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, "2024-03-10T08:30:00.000Z");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_ne!(list.tasks()[0].id, list.tasks()[1].id);
    }

    #[test]
    fn complete_then_reopen() {
        let mut list = board();
        let id = list.tasks()[0].id.clone();

        let task = list.complete(&id, now()).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at.as_deref(), Some("2024-03-10T08:30:00.000Z"));

        let later = now() + chrono::Duration::days(1);
        let task = list.complete(&id, later).unwrap();
        assert_eq!(task.completed_at.as_deref(), Some("2024-03-10T08:30:00.000Z"));

        let reopen = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            ..TaskUpdate::default()
        };
        let task = list.update(&id, reopen, later).unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn update_patches_only_given_fields() {
        let mut list = board();
        let id = list.tasks()[2].id.clone();
        let update = TaskUpdate {
            title: Some("API specification".into()),
            priority: Some(Priority::High),
            ..TaskUpdate::default()
        };
        let task = list.update(&id, update, now()).unwrap();
        assert_eq!(task.title, "API specification");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.project_id.as_deref(), Some("2"));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut list = board();
        assert!(list.get("missing").is_none());
        assert!(matches!(
            list.complete("missing", now()),
            Err(ValidationError::NotFound { kind: "task", .. })
        ));
        assert!(list.delete("missing").is_err());
    }

    #[test]
    fn project_filter_and_cascade_delete() {
        let mut list = board();
        assert_eq!(list.for_project("1").count(), 2);
        assert_eq!(list.delete_project_tasks("1"), 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.delete_project_tasks("1"), 0);
    }

    #[test]
    fn stats_count_by_status() {
        let mut list = board();
        let ids: Vec<String> = list.tasks().iter().map(|t| t.id.clone()).collect();
        list.complete(&ids[0], now()).unwrap();
        let update = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            ..TaskUpdate::default()
        };
        list.update(&ids[1], update, now()).unwrap();

        assert_eq!(
            list.stats(),
            TaskStats {
                total: 3,
                completed: 1,
                in_progress: 1,
                pending: 1,
                completion_rate: 33,
            }
        );
        assert_eq!(TaskList::default().stats(), TaskStats::default());
    }

    #[test]
    fn stats_for_project_only_count_its_tasks() {
        let mut list = board();
        let ids: Vec<String> = list.tasks().iter().map(|t| t.id.clone()).collect();
        list.complete(&ids[0], now()).unwrap();

        let stats = list.stats_for_project("1");
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(list.stats_for_project("2").completion_rate, 0);
        assert_eq!(list.stats_for_project("nope"), TaskStats::default());
    }

    #[test]
    fn completion_rate_rounds_half_up() {
        let mut list = board();
        let ids: Vec<String> = list.tasks().iter().map(|t| t.id.clone()).collect();
        list.complete(&ids[0], now()).unwrap();
        list.complete(&ids[1], now()).unwrap();
        assert_eq!(list.stats().completion_rate, 67);

        list.complete(&ids[2], now()).unwrap();
        assert_eq!(list.stats().completion_rate, 100);
    }
}
