use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TodoStore;
use crate::error::StoreError;
use crate::types::{NewTodo, Todo, UpdateTodo};

/// In-process store keyed by UUID. Listing follows insertion order.
///
/// Ids are accepted only in the canonical lowercase hyphenated form the store
/// hands out, so each todo has exactly one id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    next_seq: u64,
    todos: HashMap<Uuid, Entry>,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    todo: Todo,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    match id.parse::<Uuid>() {
        Ok(uuid) if uuid.hyphenated().to_string() == id => Ok(uuid),
        _ => Err(StoreError::InvalidId(id.to_string())),
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let id = Uuid::new_v4();
        let todo = Todo {
            id: id.to_string(),
            text: todo.text,
            completed: todo.completed,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.todos.insert(
            id,
            Entry {
                seq,
                todo: todo.clone(),
            },
        );
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let state = self.state.read().await;
        let mut entries: Vec<&Entry> = state.todos.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        Ok(entries.into_iter().map(|entry| entry.todo.clone()).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let id = parse_id(id)?;
        let state = self.state.read().await;
        Ok(state.todos.get(&id).map(|entry| entry.todo.clone()))
    }

    async fn update(&self, id: &str, patch: &UpdateTodo) -> Result<Option<Todo>, StoreError> {
        let id = parse_id(id)?;
        let mut state = self.state.write().await;
        let Some(entry) = state.todos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = &patch.text {
            entry.todo.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            entry.todo.completed = completed;
        }
        Ok(Some(entry.todo.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_id(id)?;
        Ok(self.state.write().await.todos.remove(&id).is_some())
    }
}
