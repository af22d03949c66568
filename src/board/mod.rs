//! Kanban board: task model, task store, column view and drag protocol

pub mod columns;
pub mod drag;
pub mod seed;
pub mod store;
pub mod task;

pub use columns::Board;
pub use drag::{DragController, DropOutcome, DropTarget};
pub use store::{TaskMover, TaskStore};
pub use task::{NewTask, Priority, Task, TaskPatch, TaskStatus};
