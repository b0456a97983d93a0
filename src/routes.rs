use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web;

use crate::auth::{handlers as auth_handlers, RequireAuth};
use crate::error::AppError;
use crate::health_check;
use crate::todo::handlers as todo_handlers;

/// Registers every endpoint plus the extractor configs that turn body and
/// query parsing failures into `400` responses with the usual envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/users")
                .route("/register", web::post().to(auth_handlers::register))
                .route("/login", web::post().to(auth_handlers::login))
                .service(
                    web::resource("/logout")
                        .wrap(RequireAuth)
                        .route(web::post().to(auth_handlers::logout)),
                ),
        )
        .service(
            web::scope("/todo")
                .wrap(RequireAuth)
                .route("/add", web::post().to(todo_handlers::add))
                .route("/update", web::post().to(todo_handlers::update))
                .route("/list", web::get().to(todo_handlers::list))
                .route("/delete", web::post().to(todo_handlers::delete)),
        );
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            JsonPayloadError::ContentType => "request body must be JSON".to_string(),
            JsonPayloadError::Deserialize(e) => format!("invalid request body: {}", e),
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                "request body is too large".to_string()
            }
            other => format!("invalid request body: {}", other),
        };
        AppError::ValidationError(message).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = match &err {
            QueryPayloadError::Deserialize(e) => format!("invalid query: {}", e),
            other => format!("invalid query: {}", other),
        };
        AppError::ValidationError(message).into()
    })
}
