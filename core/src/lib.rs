//! Todo model, validation and storage.
//!
//! # Overview
//! `TodoModel` validates input and delegates persistence to a `TodoStore`.
//! The store handle is built once by the caller and injected; nothing in this
//! crate holds global state.
//!
//! # Design
//! - `MemoryStore` is always available. `MongoStore` is compiled with the
//!   `mongodb` feature.
//! - Errors are a closed set (`TodoError::{Validation, NotFound, Store}`) so
//!   the HTTP layer can map every outcome to a status code.
//! - Identifiers are opaque strings; each store decides what a well-formed
//!   id looks like.

pub mod error;
pub mod model;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{StoreError, TodoError};
pub use model::TodoModel;
pub use store::{MemoryStore, TodoStore};
#[cfg(feature = "mongodb")]
pub use store::MongoStore;
pub use types::{CreateTodo, NewTodo, Todo, UpdateTodo};
pub use validate::{validate, ValidationError};
