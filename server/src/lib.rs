//! HTTP API for the todo resource.
//!
//! # Overview
//! `app` binds five handlers under `/api/v1/todos` onto a `TodoModel` passed
//! in by the caller. Responses always use the success/failure envelopes in
//! [`envelope`]. CORS is open to every origin.

pub mod config;
pub mod envelope;
pub mod error;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use todo_core::{MemoryStore, StoreError, TodoModel, TodoStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::error::ServerError;
use crate::handlers::{
    create_todo, delete_todo, get_todo, list_todos, method_not_allowed, route_not_found,
    update_todo,
};

pub fn app(todos: TodoModel) -> Router {
    Router::new()
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(todos)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Open the store named by `config`.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn TodoStore>, StoreError> {
    match &config.mongo_uri {
        #[cfg(feature = "mongodb")]
        Some(uri) => Ok(Arc::new(
            todo_core::MongoStore::connect(uri, &config.mongo_db).await?,
        )),
        #[cfg(not(feature = "mongodb"))]
        Some(_) => {
            warn!("MONGO_URI is set but this build lacks the mongodb feature; using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        None => {
            warn!("MONGO_URI is not set; todos are kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Serve until the listener fails.
pub async fn run(listener: TcpListener, todos: TodoModel) -> Result<(), std::io::Error> {
    axum::serve(listener, app(todos)).await
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, todos: TodoModel, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(todos))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Serve on `store` until `shutdown` resolves, then close the store.
///
/// The store is closed whether or not serving failed; a serving error takes
/// precedence over a close error.
pub async fn serve_and_close<F>(
    listener: TcpListener,
    store: Arc<dyn TodoStore>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served = serve(listener, TodoModel::new(Arc::clone(&store)), shutdown).await;
    let closed = store.close().await;
    served?;
    closed?;
    Ok(())
}
