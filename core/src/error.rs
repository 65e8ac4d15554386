//! Error taxonomy for the todo model and its stores.
//!
//! # Design
//! `StoreError` is what a `TodoStore` implementation reports. `TodoError` is
//! what the model reports to its callers and is the only type the HTTP layer
//! has to classify. A malformed identifier cannot name a stored todo, so the
//! model folds `StoreError::InvalidId` into `TodoError::NotFound`.

use crate::validate::ValidationError;

/// Failures reported by a `TodoStore`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier does not fit the store's addressing scheme.
    #[error("malformed id {0:?}")]
    InvalidId(String),

    /// The backend could not be reached or failed to execute the operation.
    #[error("store backend: {0}")]
    Backend(String),

    /// A stored document could not be decoded into a `Todo`.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

/// Errors returned by `TodoModel` operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TodoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => TodoError::NotFound,
            other => TodoError::Store(other),
        }
    }
}
