//! Classification of every failure into a status code and failure envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use todo_core::{StoreError, TodoError};
use tracing::error;

use crate::envelope::Failure;

pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// The request body could not be read as JSON of the expected shape.
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// Well-formed JSON of the wrong shape is a 400 like any other bad
    /// payload; other body rejections (missing content type, oversized body)
    /// keep the status axum assigns them.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Todo(TodoError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Body(JsonRejection::JsonDataError(_)) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Todo(TodoError::NotFound) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Todo(TodoError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Todo(TodoError::Validation(err)) => Failure::messages(err.into_messages()),
            ApiError::Body(rejection) => Failure::messages(vec![rejection.body_text()]),
            ApiError::Todo(TodoError::NotFound) => Failure::message(TodoError::NotFound.to_string()),
            ApiError::RouteNotFound => Failure::message("Not found"),
            ApiError::MethodNotAllowed => Failure::message("Method not allowed"),
            ApiError::Todo(TodoError::Store(err)) => {
                error!(error = %err, "store failure");
                Failure::message(SERVER_ERROR)
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Failures while running the server process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
