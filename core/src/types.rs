//! Domain types for the todo resource.
//!
//! # Design
//! `Todo` is the stored shape and the shape every response carries. The two
//! request payloads keep every field optional so that a missing `text` is a
//! validation failure with a readable message instead of a JSON decode error.
//! Both payloads must be JSON objects; serde's positional form for structs
//! (a JSON array) is refused. `NewTodo` only exists after validation has
//! passed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A single stored todo.
///
/// `id` and `created_at` are assigned by the store on insert and never change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BodyFields")]
pub struct CreateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BodyFields")]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// The mutable fields of a request body. Unknown keys are ignored.
struct BodyFields {
    text: Option<String>,
    completed: Option<bool>,
}

impl<'de> Deserialize<'de> for BodyFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BodyFieldsVisitor)
    }
}

struct BodyFieldsVisitor;

impl<'de> Visitor<'de> for BodyFieldsVisitor {
    type Value = BodyFields;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object with optional `text` and `completed`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BodyFields, A::Error> {
        let mut text: Option<Option<String>> = None;
        let mut completed: Option<Option<bool>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "text" => {
                    if text.is_some() {
                        return Err(de::Error::duplicate_field("text"));
                    }
                    text = Some(map.next_value()?);
                }
                "completed" => {
                    if completed.is_some() {
                        return Err(de::Error::duplicate_field("completed"));
                    }
                    completed = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(BodyFields {
            text: text.flatten(),
            completed: completed.flatten(),
        })
    }
}

impl From<BodyFields> for CreateTodo {
    fn from(fields: BodyFields) -> Self {
        Self {
            text: fields.text,
            completed: fields.completed,
        }
    }
}

impl From<BodyFields> for UpdateTodo {
    fn from(fields: BodyFields) -> Self {
        Self {
            text: fields.text,
            completed: fields.completed,
        }
    }
}

/// A validated, normalized todo ready to be handed to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
}

impl Todo {
    /// Apply the fields present in `patch`, producing the candidate that must
    /// pass validation before it is written back.
    pub fn merged(&self, patch: &UpdateTodo) -> CreateTodo {
        CreateTodo {
            text: Some(patch.text.clone().unwrap_or_else(|| self.text.clone())),
            completed: Some(patch.completed.unwrap_or(self.completed)),
        }
    }
}
