//! `taskdeck tasks` and `taskdeck board`: operate the persisted task store

use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use super::TasksAction;
use crate::board::{columns::short_id, Board, NewTask, TaskMover, TaskPatch, TaskStore};
use crate::error::AppError;
use crate::storage::{self, config::Config, snapshot::FileSnapshotStore};

fn open_store(config: &Config) -> Result<TaskStore> {
    let snapshots = FileSnapshotStore::new(storage::taskdeck_dir());
    TaskStore::open(config.board.store_name.clone(), Box::new(snapshots))
        .context("failed to open task store")
}

/// Execute a `tasks` subcommand against the on-disk store
pub fn execute(config: &Config, action: TasksAction) -> Result<()> {
    let mut store = open_store(config)?;
    run(&mut store, action, &mut std::io::stdout().lock())
}

/// Print the board
pub fn print_board(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    print!("{}", Board::from_tasks(store.tasks()).render_text());
    Ok(())
}

pub fn run(store: &mut TaskStore, action: TasksAction, out: &mut impl Write) -> Result<()> {
    match action {
        TasksAction::List { status } => {
            let mut count = 0;
            for task in store
                .tasks()
                .iter()
                .filter(|t| status.map_or(true, |s| t.status == s))
            {
                count += 1;
                writeln!(
                    out,
                    "{}  {:<11}  [{}]  {}",
                    short_id(&task.id),
                    task.status,
                    task.priority,
                    task.title
                )?;
            }
            if count == 0 {
                writeln!(out, "No tasks")?;
            }
        }
        TasksAction::Add {
            title,
            description,
            status,
            priority,
            assignee,
            due,
        } => {
            let new = NewTask {
                title,
                description,
                status,
                priority,
                due_date: due.as_deref().map(parse_due).transpose()?,
                assignee,
            };
            new.validate().map_err(AppError::from)?;
            let task = store.add_task(new);
            writeln!(out, "Added {}  {}", short_id(&task.id), task.title)?;
        }
        TasksAction::Edit {
            id,
            title,
            description,
            priority,
            assignee,
            due,
        } => {
            let id = resolve_id(store, &id)?;
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                status: None,
                priority,
                due_date: due.as_deref().map(parse_due).transpose()?.map(Some),
                assignee: assignee.map(Some),
            };
            patch.validate().map_err(AppError::from)?;
            let task = store.update_task(&id, patch)?;
            writeln!(out, "Updated {}  {}", short_id(&task.id), task.title)?;
        }
        TasksAction::Rm { id } => {
            let id = resolve_id(store, &id)?;
            let task = store.delete_task(&id)?;
            writeln!(out, "Deleted {}  {}", short_id(&task.id), task.title)?;
        }
        TasksAction::Mv { id, status } => {
            let id = resolve_id(store, &id)?;
            store.move_task(&id, status)?;
            writeln!(out, "Moved {} to {}", short_id(&id), status.label())?;
        }
    }
    Ok(())
}

/// Full id for an exact id or a unique id prefix
fn resolve_id(store: &TaskStore, prefix: &str) -> Result<String> {
    if store.get(prefix).is_some() {
        return Ok(prefix.to_string());
    }
    let matches: Vec<&str> = store
        .tasks()
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| !prefix.is_empty() && id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(AppError::not_found(format!("task {}", prefix)).into()),
        _ => bail!("'{}' matches {} tasks, use a longer prefix", prefix, matches.len()),
    }
}

fn parse_due(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid due date '{}', expected YYYY-MM-DD", s))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid due date '{}'", s))?;
    Ok(midnight.and_utc())
}
