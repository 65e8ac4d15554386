//! Abstract driver interface for the persistent document store.
//!
//! # Design
//! The store owns every persisted `Todo`. Callers hold an `Arc<dyn TodoStore>`
//! constructed once at startup and pass it in explicitly; there is no global
//! connection. Each method maps to exactly one store operation, and the
//! store's own concurrency control decides the outcome of racing writes.

mod memory;
#[cfg(feature = "mongodb")]
mod mongo;

pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{NewTodo, Todo, UpdateTodo};

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persist a new todo, assigning its `id` and `created_at`.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Every stored todo in the store's natural retrieval order.
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError>;

    /// Set only the fields present in `patch` on the todo with `id`, as one
    /// store operation.
    ///
    /// Returns `None` if that todo no longer exists.
    async fn update(&self, id: &str, patch: &UpdateTodo) -> Result<Option<Todo>, StoreError>;

    /// Remove a todo permanently. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Release the connection. Called once during shutdown.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
