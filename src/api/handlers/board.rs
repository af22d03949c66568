//! Board API handlers: column view and drag-and-drop

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiResult;
use crate::api::state::{AppState, BoardState};
use crate::board::{Board, DropOutcome, DropTarget, Task, TaskStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResponse {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<Task>,
    /// Descriptor a client sends back as `over` when dropping on this column
    pub drop_target: DropTarget,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub columns: Vec<ColumnResponse>,
    pub active_task: Option<String>,
}

impl BoardResponse {
    pub fn from_state(state: &BoardState) -> Self {
        let board = Board::from_tasks(state.store.tasks());
        Self {
            columns: board
                .columns
                .iter()
                .map(|column| ColumnResponse {
                    status: column.status,
                    label: column.label,
                    tasks: column.tasks.iter().map(|t| (*t).clone()).collect(),
                    drop_target: column.drop_target(),
                })
                .collect(),
            active_task: state.drag.active_task().map(str::to_string),
        }
    }
}

/// A complete drag session: pick up `task_id`, release over `over`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub task_id: String,
    #[serde(default)]
    pub over: Option<DropTarget>,
}

/// GET /api/v1/board
pub async fn get_board(State(state): State<AppState>) -> ApiResult<Json<BoardResponse>> {
    let board = state.board()?;
    Ok(Json(BoardResponse::from_state(&board)))
}

/// POST /api/v1/board/drop
///
/// Runs drag-start and drag-end under one lock. Invalid drops are reported
/// in the outcome, not as errors.
pub async fn drop_task(
    State(state): State<AppState>,
    Json(req): Json<DropRequest>,
) -> ApiResult<Json<DropOutcome>> {
    let mut guard = state.board()?;
    let BoardState { store, drag } = &mut *guard;

    // 同一把锁内完成 start/end，控制器进入时总是空闲
    drag.drag_start(store, &req.task_id);
    let outcome = drag.drag_end(store, req.over.as_ref());
    if outcome.moved() {
        info!(task = %req.task_id, "task dropped into new column");
    }
    Ok(Json(outcome))
}
