//! Request handlers.
//!
//! Each handler extracts its inputs, delegates to [`todo_core::TodoService`]
//! through [`AppState::with_service`], and shapes the outcome. Envelope
//! failures (unparseable JSON or query strings) are reported as
//! `400 Invalid Data`; a non-numeric id can never exist, so it is `404`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use todo_core::{NewTodoRequest, Todo, TodoFilters, TodoId};

pub const CREATED_MESSAGE: &str = "Todo Successfully Added";
pub const DELETED_MESSAGE: &str = "Todo Deleted";

#[derive(Debug, Default, Deserialize)]
pub struct AgendaParams {
    pub date: Option<String>,
}

/// `GET /todos/`
pub async fn list_todos(
    State(state): State<AppState>,
    filters: Result<Query<TodoFilters>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(filters) = filters.map_err(|_| ApiError::invalid_data())?;
    let todos = state
        .with_service(move |service| service.list_todos(&filters))
        .await?;
    Ok(Json(todos))
}

/// `GET /todos/{id}/`
pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(id)?;
    let todo = state.with_service(move |service| service.get_todo(id)).await?;
    Ok(Json(todo))
}

/// `GET /agenda/?date=YYYY-MM-DD`
pub async fn agenda(
    State(state): State<AppState>,
    params: Result<Query<AgendaParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::invalid_data())?;
    let todos = state
        .with_service(move |service| service.agenda(params.date.as_deref()))
        .await?;
    Ok(Json(todos))
}

/// `POST /todos/`
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<NewTodoRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::invalid_data())?;
    state
        .with_service(move |service| service.create_todo(request))
        .await?;
    Ok(CREATED_MESSAGE)
}

/// `PUT /todos/{id}/` with exactly one field in the body.
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<String, ApiError> {
    let id = todo_id(id)?;
    let Json(body) = body.map_err(|_| ApiError::invalid_data())?;
    let field = state
        .with_service(move |service| service.update_todo(id, &body))
        .await?;
    Ok(format!("{} Updated", field.label()))
}

/// `DELETE /todos/{id}/`
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<&'static str, ApiError> {
    let id = todo_id(id)?;
    state
        .with_service(move |service| service.delete_todo(id))
        .await?;
    Ok(DELETED_MESSAGE)
}

fn todo_id(id: Result<Path<TodoId>, PathRejection>) -> Result<TodoId, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}
