pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod todo;
pub mod validation;

use actix_web::HttpResponse;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, JwtIssuer};
pub use db::{DbOperations, MemoryStore, Store};

use db::operations::MIGRATOR;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<dyn Store>,
    pub auth_service: Arc<AuthService>,
    db_pool: Option<PgPool>,
}

impl AppState {
    /// Loads layered settings from files and the environment, then builds
    /// the state with [`AppState::new`].
    pub async fn from_env() -> Result<Self> {
        let config = Settings::new()?;
        info!("Configuration loaded for {} environment", config.environment);
        Self::new(config).await
    }

    /// Connects to PostgreSQL, applies migrations and wires the services on top.
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            config.database.connect_options(),
            config.database.max_connections,
            config.database.acquire_timeout(),
        )
        .await?;
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied");
        info!(
            "Connected to database {} at {}:{}",
            config.database.name, config.database.host, config.database.port
        );

        let pool = db.pool().clone();
        let mut state = Self::with_store(config, Arc::new(db));
        state.db_pool = Some(pool);
        Ok(state)
    }

    /// Builds the state around an already constructed store.
    pub fn with_store(config: Settings, store: Arc<dyn Store>) -> Self {
        let issuer = JwtIssuer::with_expiry_days(&config.auth.jwt_secret, config.auth.token_expiry_days);
        let auth_service = AuthService::new(store.clone(), Arc::new(issuer));

        Self {
            config: Arc::new(config),
            store,
            auth_service: Arc::new(auth_service),
            db_pool: None,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
            info!("Database connections closed");
        }
        Ok(())
    }
}
