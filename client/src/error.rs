//! Error types for the todo API client.
//!
//! # Design
//! The server reports failures in a `{ success: false, error }` envelope.
//! `NotFound` and `Validation` get dedicated variants because callers act on
//! them; every other non-success status lands in `HttpError` with the raw
//! status and body.

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the payload (400) with one message per problem.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
