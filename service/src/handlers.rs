//! `/todos` handlers. Each one performs a single store call.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::auth::BearerToken;
use crate::config::ReplaceSuccess;
use crate::error::ServiceError;
use crate::model::{with_id, without_id, TodoId, TodoItem};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<AppState>,
    _token: BearerToken,
) -> Result<Json<Vec<TodoItem>>, ServiceError> {
    let todos = state.store.list().await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<AppState>,
    _token: BearerToken,
    payload: Result<Json<TodoItem>, JsonRejection>,
) -> Result<Json<TodoItem>, ServiceError> {
    let Json(item) = payload?;
    let item = without_id(item);
    let id = state.store.insert(item.clone()).await?;
    tracing::debug!(%id, "created todo");
    Ok(Json(with_id(item, id)))
}

#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_todo(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ServiceError> {
    let id: TodoId = id.parse()?;
    state
        .store
        .find(id)
        .await?
        .map(Json)
        .ok_or(ServiceError::NotFound)
}

#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn replace_todo(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(id): Path<String>,
    payload: Result<Json<TodoItem>, JsonRejection>,
) -> Result<Json<TodoItem>, ServiceError> {
    let id: TodoId = id.parse()?;
    let Json(item) = payload?;
    let item = without_id(item);
    let outcome = state.store.replace(id, item.clone()).await?;
    tracing::debug!(%id, matched = outcome.matched, modified = outcome.modified, "replaced todo");

    let replaced = match state.replace_success {
        ReplaceSuccess::Matched => outcome.matched == 1,
        ReplaceSuccess::Modified => outcome.modified == 1,
    };
    if !replaced {
        return Err(ServiceError::NotFound);
    }
    Ok(Json(with_id(item, id)))
}

#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    let id: TodoId = id.parse()?;
    if state.store.delete(id).await? != 1 {
        return Err(ServiceError::NotFound);
    }
    tracing::debug!(%id, "deleted todo");
    Ok(Json(Message {
        message: "Todo deleted",
    }))
}
