//! The todo model: validation in front of a `TodoStore`.
//!
//! Every operation issues at most one write. `update_by_id` reads, merges and
//! re-validates, then hands the store only the fields named in the request,
//! so concurrent updates to different fields of one todo both land. Updates
//! to the same field are resolved by the store (last write wins).

use std::sync::Arc;

use tracing::debug;

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, UpdateTodo};
use crate::validate::validate;

#[derive(Clone)]
pub struct TodoModel {
    store: Arc<dyn TodoStore>,
}

impl TodoModel {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, candidate: &CreateTodo) -> Result<Todo, TodoError> {
        let todo = validate(candidate)?;
        let todo = self.store.insert(todo).await?;
        debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    /// Empty store yields an empty list.
    pub async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Todo, TodoError> {
        self.store.find_by_id(id).await?.ok_or(TodoError::NotFound)
    }

    pub async fn update_by_id(&self, id: &str, patch: &UpdateTodo) -> Result<Todo, TodoError> {
        let existing = self.find_by_id(id).await?;
        let valid = validate(&existing.merged(patch))?;

        let normalized = UpdateTodo {
            text: patch.text.as_ref().map(|_| valid.text),
            completed: patch.completed,
        };
        let todo = self
            .store
            .update(id, &normalized)
            .await?
            .ok_or(TodoError::NotFound)?;
        debug!(id = %todo.id, "todo updated");
        Ok(todo)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), TodoError> {
        if !self.store.delete(id).await? {
            return Err(TodoError::NotFound);
        }
        debug!(id, "todo deleted");
        Ok(())
    }
}
