//! Data-items API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::ApiResult;
use crate::api::state::AppState;
use crate::items::{CreateDataItem, DataItem, ItemPage, ListQuery, UpdateDataItem};

/// GET /api/v1/items
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ItemPage>> {
    Ok(Json(state.items.get_items(&query).await?))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataItem>> {
    Ok(Json(state.items.get_item(&id).await?))
}

/// POST /api/v1/items
pub async fn create_item(
    State(state): State<AppState>,
    Json(create): Json<CreateDataItem>,
) -> ApiResult<(StatusCode, Json<DataItem>)> {
    let item = state.items.create_item(create).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/v1/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UpdateDataItem>,
) -> ApiResult<Json<DataItem>> {
    Ok(Json(state.items.update_item(&id, update).await?))
}

/// DELETE /api/v1/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataItem>> {
    Ok(Json(state.items.delete_item(&id).await?))
}
