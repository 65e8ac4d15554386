use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_core::{MemoryStore, NewTodo, StoreError, Todo, TodoModel, TodoStore, UpdateTodo};
use todo_server::{app, serve_and_close};
use tower::ServiceExt;

const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

fn memory_app() -> Router {
    app(TodoModel::new(Arc::new(MemoryStore::new())))
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn send(app: &Router, request: Request<String>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn create(app: &Router, text: &str) -> Todo {
    let body = json!({ "text": text }).to_string();
    let (status, json) = send(app, json_request("POST", "/api/v1/todos", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(json["data"].clone()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let app = memory_app();
    let (status, json) = send(&app, empty_request("GET", "/api/v1/todos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "count": 0, "data": [] }));
}

#[tokio::test]
async fn list_count_matches_data() {
    let app = memory_app();
    for text in ["a", "b", "c"] {
        create(&app, text).await;
    }
    let (status, json) = send(&app, empty_request("GET", "/api/v1/todos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"][0]["text"], "a");
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let app = memory_app();
    let (status, json) = send(
        &app,
        json_request("POST", "/api/v1/todos", r#"{"text":"buy milk"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["text"], "buy milk");
    assert_eq!(json["data"]["completed"], false);
    assert!(json["data"]["id"].is_string());
    assert!(json["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn create_todo_with_completed_true() {
    let app = memory_app();
    let (status, json) = send(
        &app,
        json_request("POST", "/api/v1/todos", r#"{"text":"done","completed":true}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["completed"], true);
}

#[tokio::test]
async fn create_todo_without_text_returns_400() {
    let app = memory_app();
    let (status, json) = send(&app, json_request("POST", "/api/v1/todos", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "success": false, "error": ["text is required"] }));

    let (_, list) = send(&app, empty_request("GET", "/api/v1/todos")).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn create_todo_with_blank_text_returns_400() {
    let app = memory_app();
    let (status, json) = send(
        &app,
        json_request("POST", "/api/v1/todos", r#"{"text":"   "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400() {
    let app = memory_app();
    let (status, json) = send(&app, json_request("POST", "/api/v1/todos", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_array());
}

#[tokio::test]
async fn create_todo_array_body_returns_400() {
    let app = memory_app();
    let (status, json) = send(
        &app,
        json_request("POST", "/api/v1/todos", r#"["sneaky", true]"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (_, list) = send(&app, empty_request("GET", "/api/v1/todos")).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn create_todo_without_content_type_returns_415() {
    let app = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/todos")
        .body(r#"{"text":"buy milk"}"#.to_string())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_array());
}

#[tokio::test]
async fn create_todo_wrong_field_type_returns_400() {
    let app = memory_app();
    let (status, json) = send(&app, json_request("POST", "/api/v1/todos", r#"{"text":5}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found() {
    let app = memory_app();
    let uri = format!("/api/v1/todos/{MISSING_ID}");
    let (status, json) = send(&app, empty_request("GET", &uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "error": "Todo not found" }));
}

#[tokio::test]
async fn get_todo_bad_id_returns_404() {
    let app = memory_app();
    let (status, json) = send(&app, empty_request("GET", "/api/v1/todos/bad-id")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "error": "Todo not found" }));
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let app = memory_app();
    let uri = format!("/api/v1/todos/{MISSING_ID}");
    let (status, json) = send(&app, json_request("PUT", &uri, r#"{"text":"nope"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Todo not found");
}

#[tokio::test]
async fn update_todo_blank_text_returns_400() {
    let app = memory_app();
    let todo = create(&app, "buy milk").await;
    let uri = format!("/api/v1/todos/{}", todo.id);
    let (status, json) = send(&app, json_request("PUT", &uri, r#"{"text":""}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], json!(["text is required"]));
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let app = memory_app();
    let uri = format!("/api/v1/todos/{MISSING_ID}");
    let (status, json) = send(&app, empty_request("DELETE", &uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Todo not found");
}

// --- routing and middleware ---

#[tokio::test]
async fn unknown_route_uses_failure_envelope() {
    let app = memory_app();
    let (status, json) = send(&app, empty_request("GET", "/api/v2/todos")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "error": "Not found" }));
}

#[tokio::test]
async fn unrouted_method_uses_failure_envelope() {
    let app = memory_app();
    let requests = [
        empty_request("PATCH", &format!("/api/v1/todos/{MISSING_ID}")),
        empty_request("DELETE", "/api/v1/todos"),
        empty_request("PUT", "/api/v1/todos"),
    ];

    for request in requests {
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json, json!({ "success": false, "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn update_via_http_keeps_absent_fields() {
    let app = memory_app();
    let todo = create(&app, "buy milk").await;
    let uri = format!("/api/v1/todos/{}", todo.id);

    send(&app, json_request("PUT", &uri, r#"{"completed":true}"#)).await;
    let (status, json) = send(&app, json_request("PUT", &uri, r#"{"text":"buy oat milk"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["text"], "buy oat milk");
    assert_eq!(json["data"]["completed"], true);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = memory_app();
    let request = Request::builder()
        .uri("/api/v1/todos")
        .header(http::header::ORIGIN, "https://example.com")
        .body(String::new())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// --- store failures ---

struct DownStore;

#[async_trait]
impl TodoStore for DownStore {
    async fn insert(&self, _: NewTodo) -> Result<Todo, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
    async fn find_by_id(&self, _: &str) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
    async fn update(&self, _: &str, _: &UpdateTodo) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
    async fn delete(&self, _: &str) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

#[tokio::test]
async fn store_failures_return_500_without_details() {
    let app = app(TodoModel::new(Arc::new(DownStore)));
    let uri = format!("/api/v1/todos/{MISSING_ID}");
    let requests = [
        empty_request("GET", "/api/v1/todos"),
        empty_request("GET", &uri),
        json_request("POST", "/api/v1/todos", r#"{"text":"x"}"#),
        json_request("PUT", &uri, r#"{"completed":true}"#),
        empty_request("DELETE", &uri),
    ];

    for request in requests {
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "success": false, "error": "Server error" }));
    }
}

// --- process lifecycle ---

struct ClosingStore {
    inner: MemoryStore,
    closed: AtomicBool,
}

#[async_trait]
impl TodoStore for ClosingStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        self.inner.insert(todo).await
    }
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        self.inner.find_all().await
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        self.inner.find_by_id(id).await
    }
    async fn update(&self, id: &str, patch: &UpdateTodo) -> Result<Option<Todo>, StoreError> {
        self.inner.update(id, patch).await
    }
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(id).await
    }
    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn store_is_closed_after_shutdown() {
    let store = Arc::new(ClosingStore {
        inner: MemoryStore::new(),
        closed: AtomicBool::new(false),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    serve_and_close(listener, store.clone(), async {}).await.unwrap();

    assert!(store.closed.load(Ordering::SeqCst));
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = memory_app();

    // create
    let created = create(&app, "walk dog").await;
    assert!(!created.completed);
    let uri = format!("/api/v1/todos/{}", created.id);

    // list contains the one todo
    let (status, json) = send(&app, empty_request("GET", "/api/v1/todos")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["id"], created.id.as_str());

    // get
    let (status, json) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Todo = serde_json::from_value(json["data"].clone()).unwrap();
    assert_eq!(fetched, created);

    // update: only completed
    let (status, json) = send(&app, json_request("PUT", &uri, r#"{"completed":true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Todo = serde_json::from_value(json["data"].clone()).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.text, "walk dog");
    assert_eq!(updated.created_at, created.created_at);

    // update: only text
    let (status, json) = send(&app, json_request("PUT", &uri, r#"{"text":"walk cat"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["text"], "walk cat");
    assert_eq!(json["data"]["completed"], true);

    // delete
    let (status, json) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "data": {} }));

    // get after delete
    let (status, _) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // list after delete
    let (_, json) = send(&app, empty_request("GET", "/api/v1/todos")).await;
    assert_eq!(json["count"], 0);
}
