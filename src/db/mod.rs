//! Storage layer for todo-server
//!
//! `UserStore` holds credentials, `TodoStore` holds owner-scoped task lists.
//! `DbOperations` backs both with PostgreSQL; `MemoryStore` keeps everything
//! in process and is what the test suites inject.

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;

use crate::error::DatabaseError;

pub use memory::MemoryStore;
pub use models::{NewTodo, Todo, TodoId, TodoPage, TodoPatch, User, UserId};
pub use operations::DbOperations;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the login is taken.
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId, DatabaseError>;

    async fn find_user_id(&self, login: &str, password_hash: &str) -> Result<Option<UserId>, DatabaseError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn add_todo(&self, owner: UserId, todo: NewTodo) -> Result<Todo, DatabaseError>;

    /// Returns `None` when `id` does not exist for `owner`.
    async fn update_todo(&self, owner: UserId, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, DatabaseError>;

    /// Returns `None` when the requested page cannot be fulfilled,
    /// see [`models::page_is_fulfillable`].
    async fn list_todos(&self, owner: UserId, start: i64, count: i64) -> Result<Option<TodoPage>, DatabaseError>;

    /// Deleting an absent id is not an error.
    async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<(), DatabaseError>;
}

pub trait Store: UserStore + TodoStore {}

impl<T: UserStore + TodoStore> Store for T {}
