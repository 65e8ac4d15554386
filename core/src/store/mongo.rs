//! MongoDB-backed store.
//!
//! Documents live in a single `todos` collection as
//! `{ _id: ObjectId, text, completed, createdAt: Date }`. The connection is
//! opened by [`MongoStore::connect`] and released by `close`.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use tracing::info;

use super::TodoStore;
use crate::error::StoreError;
use crate::types::{NewTodo, Todo, UpdateTodo};

const COLLECTION: &str = "todos";

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    todos: Collection<Document>,
}

impl MongoStore {
    /// Connect to `uri` and verify the server answers before returning.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await.map_err(backend)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await.map_err(backend)?;

        info!(database, "MongoDB connected");
        Ok(Self {
            todos: db.collection::<Document>(COLLECTION),
            client,
        })
    }
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn corrupt(err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn to_chrono(at: bson::DateTime) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(at.timestamp_millis())
        .ok_or_else(|| corrupt(format!("createdAt out of range: {at:?}")))
}

fn decode(doc: &Document) -> Result<Todo, StoreError> {
    Ok(Todo {
        id: doc.get_object_id("_id").map_err(corrupt)?.to_hex(),
        text: doc.get_str("text").map_err(corrupt)?.to_string(),
        completed: doc.get_bool("completed").map_err(corrupt)?,
        created_at: to_chrono(*doc.get_datetime("createdAt").map_err(corrupt)?)?,
    })
}

/// `$set` body naming only the fields present in `patch`.
fn set_fields(patch: &UpdateTodo) -> Document {
    let mut fields = Document::new();
    if let Some(text) = &patch.text {
        fields.insert("text", text.as_str());
    }
    if let Some(completed) = patch.completed {
        fields.insert("completed", completed);
    }
    fields
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let oid = ObjectId::new();
        let now = bson::DateTime::now();
        self.todos
            .insert_one(doc! {
                "_id": oid,
                "text": todo.text.as_str(),
                "completed": todo.completed,
                "createdAt": now,
            })
            .await
            .map_err(backend)?;

        Ok(Todo {
            id: oid.to_hex(),
            text: todo.text,
            completed: todo.completed,
            created_at: to_chrono(now)?,
        })
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let docs: Vec<Document> = self
            .todos
            .find(doc! {})
            .await
            .map_err(backend)?
            .try_collect()
            .await
            .map_err(backend)?;
        docs.iter().map(decode).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let oid = parse_id(id)?;
        let found = self
            .todos
            .find_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        found.as_ref().map(decode).transpose()
    }

    async fn update(&self, id: &str, patch: &UpdateTodo) -> Result<Option<Todo>, StoreError> {
        let oid = parse_id(id)?;
        let fields = set_fields(patch);
        if fields.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .todos
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(backend)?;
        updated.as_ref().map(decode).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let result = self
            .todos
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count > 0)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        info!("MongoDB connection closed");
        Ok(())
    }
}
