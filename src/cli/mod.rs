//! CLI 模块

pub mod setup;
pub mod tasks;
pub mod web;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::board::{Priority, TaskStatus};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version)]
#[command(about = "Admin dashboard with a kanban task board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web UI server (API + pages)
    Web {
        /// Address to bind (defaults to [web].host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (defaults to [web].port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,
    },
    /// Interactive wizard that writes .env.local and .env.example
    Setup {
        /// Directory the env files are written to
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Manage tasks in the persisted board
    Tasks {
        #[command(subcommand)]
        action: TasksAction,
    },
    /// Print the board's four columns
    Board,
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// List tasks
    List {
        /// Only tasks in this column
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(short, long)]
        assignee: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// Edit fields of a task
    Edit {
        /// Task id or unique id prefix
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        assignee: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
    },
    /// Move a task to another column
    Mv {
        /// Task id or unique id prefix
        id: String,
        status: TaskStatus,
    },
}
