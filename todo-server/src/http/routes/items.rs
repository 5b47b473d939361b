//! Todo item endpoints
//!
//! Each handler makes exactly one store call (update also reads back).
//! No validation beyond what the database enforces.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{CreateItemRequest, TodoItem, UpdateItemRequest};

/// GET /items - list all items
async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let items = state.store.get_items().await?;
    Ok(Json(items))
}

/// GET /items/{id} - get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let item = state
        .store
        .get_item(&id)
        .await?
        .ok_or(ApiError::NotFound { id })?;

    Ok(Json(item))
}

/// POST /items - store a new item
async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let item = req.into_item();
    state.store.store_item(&item).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/{id} - replace name and completed
///
/// Responds 200 whether or not a row matched.
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<TodoItem>, ApiError> {
    state.store.update_item(&id, &req).await?;

    let item = match state.store.get_item(&id).await? {
        Some(item) => item,
        None => TodoItem {
            id,
            name: req.name,
            completed: req.completed,
        },
    };

    Ok(Json(item))
}

/// DELETE /items/{id} - remove an item (idempotent)
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.remove_item(&id).await?;
    Ok(StatusCode::OK)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
