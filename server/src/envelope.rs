//! Uniform JSON envelopes wrapped around every response body.

use serde::Serialize;

/// `{ "success": true, ["count": n,] "data": ... }`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }
}

impl<T> Success<Vec<T>> {
    /// List payload; `count` always equals `data.len()`.
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
        }
    }
}

/// `{ "success": false, "error": "..." | ["...", ...] }`
#[derive(Debug, Serialize)]
pub struct Failure {
    success: bool,
    error: ErrorMessage,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl Failure {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorMessage::One(message.into()),
        }
    }

    pub fn messages(messages: Vec<String>) -> Self {
        Self {
            success: false,
            error: ErrorMessage::Many(messages),
        }
    }
}
