//! Synchronous client for the todo HTTP API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the round-trip, which keeps the
//! client deterministic and lets tests drive it against any transport.
//!
//! # Design
//! - `TodoClient` holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`.
//! - Payload and result types are the ones `todo-core` defines, so the
//!   client and server cannot drift apart.

pub mod client;
pub mod error;
pub mod http;

pub use client::{TodoClient, TodoList};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use todo_core::{CreateTodo, Todo, UpdateTodo};
