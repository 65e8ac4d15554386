//! The five todo handlers. Each one calls the model once and wraps the
//! outcome in an envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};
use todo_core::{CreateTodo, Todo, TodoModel, UpdateTodo};

use crate::envelope::Success;
use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

pub(crate) async fn list_todos(State(todos): State<TodoModel>) -> ApiResult<Json<Success<Vec<Todo>>>> {
    Ok(Json(Success::list(todos.find_all().await?)))
}

pub(crate) async fn get_todo(
    State(todos): State<TodoModel>,
    Path(id): Path<String>,
) -> ApiResult<Json<Success<Todo>>> {
    Ok(Json(Success::new(todos.find_by_id(&id).await?)))
}

pub(crate) async fn create_todo(
    State(todos): State<TodoModel>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Success<Todo>>)> {
    let Json(input) = body?;
    let todo = todos.create(&input).await?;
    Ok((StatusCode::CREATED, Json(Success::new(todo))))
}

pub(crate) async fn update_todo(
    State(todos): State<TodoModel>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodo>, JsonRejection>,
) -> ApiResult<Json<Success<Todo>>> {
    let Json(patch) = body?;
    Ok(Json(Success::new(todos.update_by_id(&id, &patch).await?)))
}

pub(crate) async fn delete_todo(
    State(todos): State<TodoModel>,
    Path(id): Path<String>,
) -> ApiResult<Json<Success<Map<String, Value>>>> {
    todos.delete_by_id(&id).await?;
    Ok(Json(Success::new(Map::new())))
}

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
