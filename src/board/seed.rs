use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::task::{Priority, Task, TaskStatus};

/// 生成初始示例任务，日期相对 `now`
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let days = Duration::days;
    let task = |title: &str,
                description: &str,
                status: TaskStatus,
                priority: Priority,
                created_days_ago: i64,
                due_in_days: Option<i64>| Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
        priority,
        created_at: now - days(created_days_ago),
        due_date: due_in_days.map(|d| now + days(d)),
        assignee: None,
    };

    vec![
        task(
            "Implement authentication",
            "Set up session sign-in for dashboard users",
            TaskStatus::Done,
            Priority::High,
            7,
            None,
        ),
        task(
            "Create dashboard layout",
            "Design and implement responsive dashboard layout",
            TaskStatus::Done,
            Priority::High,
            5,
            None,
        ),
        task(
            "Build data tables",
            "Implement data tables with sorting, filtering, and pagination",
            TaskStatus::InProgress,
            Priority::Medium,
            3,
            Some(2),
        ),
        task(
            "Add user profile management",
            "Create user profile page with editing capabilities",
            TaskStatus::Todo,
            Priority::Medium,
            2,
            Some(5),
        ),
        task(
            "Implement Kanban board",
            "Create task management with drag-and-drop functionality",
            TaskStatus::Review,
            Priority::High,
            1,
            Some(1),
        ),
        task(
            "Add charts and analytics",
            "Implement data visualization for the dashboard",
            TaskStatus::Todo,
            Priority::Low,
            0,
            Some(7),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_dates_relative_to_now() {
        let now = Utc::now();
        let tasks = seed_tasks(now);
        assert_eq!(tasks.len(), 6);
        assert!(tasks.iter().all(|t| t.created_at <= now));
        assert!(tasks
            .iter()
            .filter_map(|t| t.due_date)
            .all(|due| due > now));
    }
}
