use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::models::{page_is_fulfillable, NewTodo, Todo, TodoId, TodoPage, TodoPatch, User, UserId};
use crate::db::{TodoStore, UserStore};
use crate::error::DatabaseError;

#[derive(Debug)]
struct StoredTodo {
    owner: UserId,
    todo: Todo,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    todos: BTreeMap<TodoId, StoredTodo>,
    next_user_id: UserId,
    next_todo_id: TodoId,
}

/// In-process store with the same semantics as the PostgreSQL one.
///
/// Each instance is independent, so tests construct a fresh one instead of
/// sharing state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId, DatabaseError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.login == login) {
            return Err(DatabaseError::Duplicate);
        }

        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.push(User {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        });

        Ok(id)
    }

    async fn find_user_id(&self, login: &str, password_hash: &str) -> Result<Option<UserId>, DatabaseError> {
        let state = self.state.read().await;

        Ok(state
            .users
            .iter()
            .find(|u| u.login == login && u.password_hash == password_hash)
            .map(|u| u.id))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn add_todo(&self, owner: UserId, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let mut state = self.state.write().await;

        state.next_todo_id += 1;
        let todo = Todo {
            id: state.next_todo_id,
            text: todo.text,
            completed: todo.completed,
        };
        state.todos.insert(todo.id, StoredTodo { owner, todo: todo.clone() });

        Ok(todo)
    }

    async fn update_todo(&self, owner: UserId, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, DatabaseError> {
        let mut state = self.state.write().await;

        Ok(state
            .todos
            .get_mut(&id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| {
                patch.apply(&mut stored.todo);
                stored.todo.clone()
            }))
    }

    async fn list_todos(&self, owner: UserId, start: i64, count: i64) -> Result<Option<TodoPage>, DatabaseError> {
        let state = self.state.read().await;

        let owned: Vec<&Todo> = state
            .todos
            .values()
            .filter(|stored| stored.owner == owner)
            .map(|stored| &stored.todo)
            .collect();

        let total = owned.len() as i64;
        if !page_is_fulfillable(total, start, count) {
            return Ok(None);
        }

        let completed = owned.iter().filter(|todo| todo.completed).count() as i64;
        let list = owned
            .into_iter()
            .skip(start as usize)
            .take(count as usize)
            .cloned()
            .collect();

        Ok(Some(TodoPage {
            list,
            count: total,
            completed_count: completed,
        }))
    }

    async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;

        if state.todos.get(&id).is_some_and(|stored| stored.owner == owner) {
            state.todos.remove(&id);
        }

        Ok(())
    }
}
