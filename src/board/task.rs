use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{self, FieldErrors};

/// 看板列（任务状态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Column order on the board
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
        }
    }

    /// Parse a wire value; anything outside the four columns is `None`
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown status '{}' (expected todo, in-progress, review or done)",
                s
            )
        })
    }
}

/// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!(
                "unknown priority '{}' (expected low, medium or high)",
                s
            )),
        }
    }
}

/// 任务数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID v4, assigned by the store
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// 创建时间，创建后不可修改
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// Fields a caller supplies when adding a task (no id, no created_at)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<String>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            assignee: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Form rules: title of at least two characters
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        validate_title(&mut errors, &self.title);
        errors.into_result()
    }
}

/// Shallow patch: `None` keeps the current value.
///
/// Optional task fields use a nested option so a patch can clear them:
/// `Some(None)` (JSON `null`) clears, an absent key keeps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub assignee: Option<Option<String>>,
}

/// Distinguish `"key": null` (→ `Some(None)`) from a missing key (→ `None`)
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(title) = &self.title {
            validate_title(&mut errors, title);
        }
        errors.into_result()
    }

    /// Merge into `task`; id and created_at are never touched
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
    }
}

fn validate_title(errors: &mut FieldErrors, title: &str) {
    validation::min_chars(
        errors,
        "title",
        title,
        2,
        "Title must be at least 2 characters.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t-1".to_string(),
            title: "Write docs".to_string(),
            description: Some("README".to_string()),
            status: TaskStatus::Todo,
            priority: Priority::Low,
            created_at: Utc::now(),
            due_date: None,
            assignee: Some("sam".to_string()),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(TaskStatus::parse("review"), Some(TaskStatus::Review));
        assert_eq!(TaskStatus::parse("Review"), None);
        assert_eq!(TaskStatus::parse("container-todo"), None);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let mut task = sample_task();
        let created = task.created_at;
        TaskPatch {
            title: Some("Write better docs".to_string()),
            ..TaskPatch::default()
        }
        .apply(&mut task);

        assert_eq!(task.title, "Write better docs");
        assert_eq!(task.description.as_deref(), Some("README"));
        assert_eq!(task.assignee.as_deref(), Some("sam"));
        assert_eq!(task.created_at, created);
        assert_eq!(task.id, "t-1");
    }

    #[test]
    fn test_patch_json_null_clears_but_missing_keeps() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"assignee": null, "priority": "high"}"#).unwrap();
        assert_eq!(patch.assignee, Some(None));
        assert_eq!(patch.description, None);

        let mut task = sample_task();
        patch.apply(&mut task);
        assert_eq!(task.assignee, None);
        assert_eq!(task.description.as_deref(), Some("README"));
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_new_task_defaults_and_validation() {
        let new: NewTask = serde_json::from_str(r#"{"title": "Ship it"}"#).unwrap();
        assert_eq!(new.status, TaskStatus::Todo);
        assert_eq!(new.priority, Priority::Medium);
        assert!(new.validate().is_ok());

        let errors = NewTask::new("x").validate().unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some("Title must be at least 2 characters.")
        );
    }

    #[test]
    fn test_task_json_is_camel_case() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dueDate").is_none());
        assert_eq!(json["status"], "todo");
    }
}
