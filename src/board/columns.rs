//! Column view: tasks grouped into the four status buckets

use serde::Serialize;

use super::drag::DropTarget;
use super::task::{Task, TaskStatus};

/// One status column
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    /// Drop region this column registers, tagged with its status
    pub fn drop_target(&self) -> DropTarget {
        DropTarget::column(self.status)
    }
}

/// All four columns in board order, always present even when empty
#[derive(Debug, Serialize)]
pub struct Board<'a> {
    pub columns: [Column<'a>; 4],
}

impl<'a> Board<'a> {
    pub fn from_tasks(tasks: &'a [Task]) -> Self {
        let mut columns = TaskStatus::ALL.map(|status| Column {
            status,
            label: status.label(),
            tasks: Vec::new(),
        });
        for task in tasks {
            // ALL is indexed in declaration order
            columns[task.status as usize].tasks.push(task);
        }
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        &self.columns[status as usize]
    }

    /// Task count per column, in board order
    pub fn counts(&self) -> [(TaskStatus, usize); 4] {
        TaskStatus::ALL.map(|status| (status, self.column(status).tasks.len()))
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for column in &self.columns {
            out.push_str(&format!("{} ({})\n", column.label, column.tasks.len()));
            if column.tasks.is_empty() {
                out.push_str("  -\n");
            }
            for task in &column.tasks {
                out.push_str(&format!(
                    "  [{}] {}  ({})\n",
                    task.priority,
                    task.title,
                    short_id(&task.id)
                ));
            }
        }
        out
    }
}

/// First segment of a UUID, enough to address a task from the CLI
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
