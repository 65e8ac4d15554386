//! Field-level validation run before any write reaches a store.

use crate::types::{CreateTodo, NewTodo};

/// One message per invalid field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", .messages.join(", "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl From<Vec<String>> for ValidationError {
    fn from(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

/// Check `candidate` and normalize it for persistence.
///
/// `text` is trimmed and must not be empty afterwards; `completed` defaults
/// to `false`.
pub fn validate(candidate: &CreateTodo) -> Result<NewTodo, ValidationError> {
    let mut messages = Vec::new();

    let text = candidate.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        messages.push("text is required".to_string());
    }

    if !messages.is_empty() {
        return Err(ValidationError { messages });
    }

    Ok(NewTodo {
        text: text.to_string(),
        completed: candidate.completed.unwrap_or(false),
    })
}
