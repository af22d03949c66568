//! Task API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::api::state::AppState;
use crate::board::{NewTask, Task, TaskMover, TaskPatch, TaskStatus};
use crate::error::AppError;

/// Move request
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub status: TaskStatus,
}

/// GET /api/v1/tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let board = state.board()?;
    Ok(Json(board.store.tasks().to_vec()))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let board = state.board()?;
    board
        .store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("task {}", id)).into())
}

/// POST /api/v1/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Json(new): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    new.validate()?;
    let mut board = state.board()?;
    let task = board.store.add_task(new).clone();
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/v1/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    patch.validate()?;
    let mut board = state.board()?;
    let task = board.store.update_task(&id, patch)?.clone();
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut board = state.board()?;
    board.store.delete_task(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tasks/{id}/move
pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Json<Task>> {
    let mut board = state.board()?;
    board.store.move_task(&id, req.status)?;
    let task = board
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("task {}", id)))?;
    Ok(Json(task))
}
