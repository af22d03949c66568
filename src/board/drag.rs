//! Drag-and-drop status reassignment
//!
//! A drag session runs from drag-start to drag-end for a single task. At
//! drag-end the drop target is resolved to a status column with a fixed
//! precedence, and the task is moved only when that column differs from the
//! one it was dragged out of.
//!
//! ```text
//!   Idle ──drag_start(task)──▶ Dragging ──drag_end(over)──▶ Idle
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::{TaskMover, TaskStore};
use super::task::TaskStatus;

/// What the pointer was released over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Identifier of the element under the pointer
    pub id: String,
    #[serde(default)]
    pub kind: DropKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DropKind {
    /// A column's registered drop region
    Column { status: TaskStatus },
    /// A task card inside a sortable list
    Card { container: String },
    /// Anything else
    #[default]
    Other,
}

impl DropTarget {
    /// Drop region registered by a column
    pub fn column(status: TaskStatus) -> Self {
        Self {
            id: status.as_str().to_string(),
            kind: DropKind::Column { status },
        }
    }

    /// A card with id `card_id` listed in the sortable container `container`
    pub fn card(card_id: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            id: card_id.into(),
            kind: DropKind::Card {
                container: container.into(),
            },
        }
    }

    pub fn other(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DropKind::Other,
        }
    }
}

/// Resolve the status column a drop lands in; first match wins.
///
/// 1. the target id is itself a status (bare column or header)
/// 2. the target is a column drop region
/// 3. the target is a card whose sortable container id is a status
///
/// `None` means the drop is invalid.
pub fn resolve_target_status(target: &DropTarget) -> Option<TaskStatus> {
    if let Some(status) = TaskStatus::parse(&target.id) {
        return Some(status);
    }
    match &target.kind {
        DropKind::Column { status } => Some(*status),
        DropKind::Card { container } => TaskStatus::parse(container),
        DropKind::Other => None,
    }
}

/// How a drag session ended. None of these is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum DropOutcome {
    Moved {
        #[serde(rename = "taskId")]
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// Dropped back into the column it came from
    SameColumn { status: TaskStatus },
    /// Released over something that is not a column
    InvalidTarget,
    /// Released over nothing
    NoTarget,
    /// The task's source column was unknown at drag-start, or the task was
    /// gone by the time of the move
    UnknownTask,
    /// drag_end without a preceding drag_start
    NotDragging,
}

impl DropOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, DropOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging {
        task_id: String,
        source: Option<TaskStatus>,
    },
}

/// Tracks the active drag and commits the resulting move
#[derive(Debug)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the task currently being dragged
    pub fn active_task(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { task_id, .. } => Some(task_id),
            DragState::Idle => None,
        }
    }

    /// Begin dragging `task_id`, remembering the column it sits in now.
    ///
    /// Returns false (and changes nothing) if another drag is in progress.
    pub fn drag_start(&mut self, store: &TaskStore, task_id: &str) -> bool {
        let source = store.get(task_id).map(|t| t.status);
        self.begin(task_id, source)
    }

    fn begin(&mut self, task_id: &str, source: Option<TaskStatus>) -> bool {
        if let DragState::Dragging { task_id: active, .. } = &self.state {
            debug!(active = %active, requested = %task_id, "drag already in progress");
            return false;
        }
        debug!(task = %task_id, source = ?source, "drag start");
        self.state = DragState::Dragging {
            task_id: task_id.to_string(),
            source,
        };
        true
    }

    /// Finish the drag over `over` and move the task if it changed columns.
    ///
    /// Always returns the controller to idle.
    pub fn drag_end<M: TaskMover>(&mut self, mover: &mut M, over: Option<&DropTarget>) -> DropOutcome {
        let (task_id, source) = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { task_id, source } => (task_id, source),
            DragState::Idle => return DropOutcome::NotDragging,
        };

        let Some(over) = over else {
            debug!(task = %task_id, "drag ended over nothing");
            return DropOutcome::NoTarget;
        };

        let Some(target) = resolve_target_status(over) else {
            warn!(task = %task_id, over = %over.id, kind = ?over.kind, "drag ended over invalid target");
            return DropOutcome::InvalidTarget;
        };

        let Some(source) = source else {
            debug!(task = %task_id, target = %target, "source column unknown, not moving");
            return DropOutcome::UnknownTask;
        };

        if source == target {
            debug!(task = %task_id, status = %target, "dropped into same column");
            return DropOutcome::SameColumn { status: target };
        }

        match mover.move_task(&task_id, target) {
            Ok(()) => DropOutcome::Moved {
                task_id,
                from: source,
                to: target,
            },
            Err(e) => {
                debug!(task = %task_id, error = %e, "move skipped");
                DropOutcome::UnknownTask
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::task::NewTask;
    use crate::error::{AppError, Result};
    use crate::storage::snapshot::MemorySnapshotStore;

    /// Records every move instead of applying it
    #[derive(Default)]
    struct RecordingMover {
        moves: Vec<(String, TaskStatus)>,
    }

    impl TaskMover for RecordingMover {
        fn move_task(&mut self, id: &str, status: TaskStatus) -> Result<()> {
            self.moves.push((id.to_string(), status));
            Ok(())
        }
    }

    fn store_with(status: TaskStatus) -> (TaskStore, String) {
        let mut store = TaskStore::with_tasks(
            "board",
            Box::new(MemorySnapshotStore::new()),
            Vec::new(),
        );
        let id = store
            .add_task(NewTask::new("Dragged").with_status(status))
            .id
            .clone();
        (store, id)
    }

    #[test]
    fn test_precedence_status_id_beats_everything() {
        let target = DropTarget {
            id: "done".to_string(),
            kind: DropKind::Card {
                container: "review".to_string(),
            },
        };
        assert_eq!(resolve_target_status(&target), Some(TaskStatus::Done));
    }

    #[test]
    fn test_precedence_column_marker_beats_card_container() {
        let target = DropTarget {
            id: "container-review".to_string(),
            kind: DropKind::Column {
                status: TaskStatus::Review,
            },
        };
        assert_eq!(resolve_target_status(&target), Some(TaskStatus::Review));
        assert_eq!(
            resolve_target_status(&DropTarget::column(TaskStatus::InProgress)),
            Some(TaskStatus::InProgress)
        );
    }

    #[test]
    fn test_card_container_and_invalid_targets() {
        assert_eq!(
            resolve_target_status(&DropTarget::card("task-9", "review")),
            Some(TaskStatus::Review)
        );
        assert_eq!(
            resolve_target_status(&DropTarget::card("task-9", "backlog")),
            None
        );
        assert_eq!(resolve_target_status(&DropTarget::other("trash")), None);
    }

    #[test]
    fn test_drop_on_literal_done_moves_task() {
        let (mut store, id) = store_with(TaskStatus::Todo);
        let mut drag = DragController::new();

        assert!(drag.drag_start(&store, &id));
        let outcome = drag.drag_end(&mut store, Some(&DropTarget::other("done")));

        assert_eq!(
            outcome,
            DropOutcome::Moved {
                task_id: id.clone(),
                from: TaskStatus::Todo,
                to: TaskStatus::Done,
            }
        );
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Done);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_on_card_in_review_moves_task() {
        let (mut store, id) = store_with(TaskStatus::Todo);
        let mut drag = DragController::new();

        drag.drag_start(&store, &id);
        let outcome = drag.drag_end(&mut store, Some(&DropTarget::card("other-card", "review")));

        assert!(outcome.moved());
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Review);
    }

    #[test]
    fn test_drop_on_unknown_target_leaves_task() {
        let (mut store, id) = store_with(TaskStatus::Todo);
        let mut drag = DragController::new();

        drag.drag_start(&store, &id);
        let outcome = drag.drag_end(&mut store, Some(&DropTarget::other("sidebar")));

        assert_eq!(outcome, DropOutcome::InvalidTarget);
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Todo);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_same_column_never_calls_move() {
        let (store, id) = store_with(TaskStatus::Todo);
        let mut mover = RecordingMover::default();
        let mut drag = DragController::new();

        drag.drag_start(&store, &id);
        let outcome = drag.drag_end(&mut mover, Some(&DropTarget::card("neighbour", "todo")));
        assert_eq!(
            outcome,
            DropOutcome::SameColumn {
                status: TaskStatus::Todo
            }
        );

        drag.drag_start(&store, &id);
        drag.drag_end(&mut mover, Some(&DropTarget::column(TaskStatus::Todo)));

        assert!(mover.moves.is_empty());
    }

    #[test]
    fn test_drop_over_nothing_and_end_without_start() {
        let (store, id) = store_with(TaskStatus::Review);
        let mut mover = RecordingMover::default();
        let mut drag = DragController::new();

        assert_eq!(drag.drag_end(&mut mover, None), DropOutcome::NotDragging);

        drag.drag_start(&store, &id);
        assert_eq!(drag.drag_end(&mut mover, None), DropOutcome::NoTarget);
        assert!(mover.moves.is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_second_drag_start_is_ignored() {
        let (mut store, first) = store_with(TaskStatus::Todo);
        let second = store
            .add_task(NewTask::new("Another").with_status(TaskStatus::Done))
            .id
            .clone();
        let mut drag = DragController::new();

        assert!(drag.drag_start(&store, &first));
        assert!(!drag.drag_start(&store, &second));
        assert_eq!(drag.active_task(), Some(first.as_str()));
    }

    #[test]
    fn test_unknown_task_is_never_moved() {
        let (store, _) = store_with(TaskStatus::Todo);
        let mut mover = RecordingMover::default();
        let mut drag = DragController::new();

        drag.drag_start(&store, "ghost");
        let outcome = drag.drag_end(&mut mover, Some(&DropTarget::column(TaskStatus::Done)));

        assert_eq!(outcome, DropOutcome::UnknownTask);
        assert!(mover.moves.is_empty());
    }

    struct VanishingMover;

    impl TaskMover for VanishingMover {
        fn move_task(&mut self, id: &str, _status: TaskStatus) -> Result<()> {
            Err(AppError::not_found(format!("task {}", id)))
        }
    }

    #[test]
    fn test_move_not_found_is_silent() {
        let (store, id) = store_with(TaskStatus::Todo);
        let mut drag = DragController::new();

        drag.drag_start(&store, &id);
        let outcome = drag.drag_end(&mut VanishingMover, Some(&DropTarget::other("done")));
        assert_eq!(outcome, DropOutcome::UnknownTask);
    }

    #[test]
    fn test_drop_target_json_shape() {
        let target: DropTarget = serde_json::from_str(
            r#"{"id": "card-3", "kind": {"type": "card", "container": "in-progress"}}"#,
        )
        .unwrap();
        assert_eq!(resolve_target_status(&target), Some(TaskStatus::InProgress));

        let bare: DropTarget = serde_json::from_str(r#"{"id": "review"}"#).unwrap();
        assert_eq!(bare.kind, DropKind::Other);
        assert_eq!(resolve_target_status(&bare), Some(TaskStatus::Review));
    }
}
