use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i64;
pub type TodoId = i64;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: TodoId,
    #[sqlx(rename = "task")]
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// One page of a user's todos plus counts over the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub list: Vec<Todo>,
    pub count: i64,
    #[serde(rename = "completedCount")]
    pub completed_count: i64,
}

/// A page is only served when `start + count` fits inside a non-empty list.
pub fn page_is_fulfillable(total: i64, start: i64, count: i64) -> bool {
    if start < 0 || count < 0 {
        return false;
    }
    match start.checked_add(count) {
        Some(end) => total > 0 && end <= total,
        None => false,
    }
}
