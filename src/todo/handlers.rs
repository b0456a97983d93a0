use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::AuthenticatedUser;
use crate::db::{NewTodo, TodoId, TodoPatch};
use crate::error::{AppError, DatabaseError};
use crate::validation::{non_negative, required};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: Option<TodoId>,
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTodoRequest {
    pub id: Option<TodoId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListQuery {
    pub start: Option<i64>,
    pub count: Option<i64>,
}

pub async fn add(
    user: AuthenticatedUser,
    req: web::Json<AddTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let todo = NewTodo {
        text: required("text", req.text)?,
        completed: required("completed", req.completed)?,
    };

    let todo = state.store.add_todo(user.user_id, todo).await?;
    info!("User {} added todo {}", user.user_id, todo.id);

    Ok(HttpResponse::Ok().json(todo))
}

pub async fn update(
    user: AuthenticatedUser,
    req: web::Json<UpdateTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let id = required("id", req.id)?;
    let patch = TodoPatch {
        text: req.text,
        completed: req.completed,
    };

    let todo = state
        .store
        .update_todo(user.user_id, id, patch)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    debug!("User {} updated todo {}", user.user_id, id);

    Ok(HttpResponse::Ok().json(todo))
}

pub async fn list(
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let start = non_negative("start", required("start", query.start)?)?;
    let count = non_negative("count", required("count", query.count)?)?;

    let page = state
        .store
        .list_todos(user.user_id, start, count)
        .await?
        .ok_or(AppError::BadRange)?;

    Ok(HttpResponse::Ok().json(page))
}

pub async fn delete(
    user: AuthenticatedUser,
    req: web::Json<DeleteTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = required("id", req.into_inner().id)?;

    state.store.delete_todo(user.user_id, id).await?;
    info!("User {} deleted todo {}", user.user_id, id);

    Ok(HttpResponse::Ok().finish())
}
