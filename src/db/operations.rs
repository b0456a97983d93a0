use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

use crate::db::models::{page_is_fulfillable, NewTodo, Todo, TodoId, TodoPage, TodoPatch, UserId};
use crate::db::{TodoStore, UserStore};
use crate::error::DatabaseError;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct DbOperations {
    pool: PgPool,
}

impl DbOperations {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        options: PgConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>, DatabaseError> {
        Ok(self.pool.begin().await?)
    }
}

#[async_trait]
impl UserStore for DbOperations {
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId, DatabaseError> {
        let id: UserId = sqlx::query_scalar(
            "INSERT INTO users (login, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_user_id(&self, login: &str, password_hash: &str) -> Result<Option<UserId>, DatabaseError> {
        let id: Option<UserId> = sqlx::query_scalar(
            "SELECT id FROM users WHERE login = $1 AND password_hash = $2",
        )
        .bind(login)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }
}

#[async_trait]
impl TodoStore for DbOperations {
    async fn add_todo(&self, owner: UserId, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (task, completed, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, task, completed
            "#,
        )
        .bind(&todo.text)
        .bind(todo.completed)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update_todo(&self, owner: UserId, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET task = COALESCE($1, task), completed = COALESCE($2, completed)
            WHERE id = $3 AND owner_id = $4
            RETURNING id, task, completed
            "#,
        )
        .bind(patch.text)
        .bind(patch.completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn list_todos(&self, owner: UserId, start: i64, count: i64) -> Result<Option<TodoPage>, DatabaseError> {
        // Counts and page come from one snapshot.
        let mut transaction = self.begin_transaction().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *transaction)
            .await?;

        let (total, completed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE completed)
            FROM todos
            WHERE owner_id = $1
            "#,
        )
        .bind(owner)
        .fetch_one(&mut *transaction)
        .await?;

        if !page_is_fulfillable(total, start, count) {
            transaction.commit().await?;
            return Ok(None);
        }

        let list = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, task, completed
            FROM todos
            WHERE owner_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(count)
        .bind(start)
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(Some(TodoPage {
            list,
            count: total,
            completed_count: completed,
        }))
    }

    async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
