use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password::check_strength;
use crate::error::AppError;
use crate::validation::{length_between, required, validate_login, PASSWORD_MAX_LEN};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn validate(self) -> Result<(String, String), AppError> {
        let login = required("login", self.login)?;
        let password = required("password", self.password)?;
        Ok((login.to_lowercase(), password))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (login, password) = req.into_inner().validate()?;
    info!("Received login request for {}", login);

    match state.auth_service.authenticate(&login, &password).await {
        Ok(token) => {
            info!("Login successful for {}", login);
            Ok(HttpResponse::Ok().json(AuthResponse { token }))
        }
        Err(e @ AppError::AuthError(_)) => {
            warn!("Login failed for {}: {}", login, e);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub login: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
}

impl RegisterRequest {
    /// Field rules first, then the confirmation and strength checks.
    fn validate(self, min_entropy: f64) -> Result<(String, String), AppError> {
        let login = required("login", self.login)?;
        let password = required("password", self.password)?;
        let password2 = required("password2", self.password2)?;

        validate_login(&login)?;
        length_between("password", &password, 1, PASSWORD_MAX_LEN)?;

        if password != password2 {
            return Err(AppError::ValidationError("Entered passwords didn't match".into()));
        }
        check_strength(&password, min_entropy).map_err(AppError::ValidationError)?;

        Ok((login.to_lowercase(), password))
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (login, password) = req.into_inner().validate(state.config.auth.min_password_entropy)?;
    info!("Received registration request for {}", login);

    state.auth_service.register(&login, &password).await?;

    Ok(HttpResponse::Created().finish())
}

pub async fn logout(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.auth_service.logout(&user.credential).await?;
    info!("User {} logged out", user.user_id);

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use std::sync::Arc;

    use crate::db::mock::MockStorage;
    use crate::db::{MemoryStore, Store};
    use crate::error::DatabaseError;
    use crate::{routes, Settings};

    async fn login_status(store: Arc<dyn Store>) -> (StatusCode, serde_json::Value) {
        let state = AppState::with_store(Settings::new_for_test().unwrap(), store);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes::configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/users/login")
            .set_json(serde_json::json!({ "login": "alice", "password": "Passwd@1" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        let status = resp.status();
        (status, actix_test::read_body_json(resp).await)
    }

    #[test_log::test(actix_web::test)]
    async fn test_login_failures_keep_their_kind() {
        let (status, body) = login_status(Arc::new(MemoryStore::new())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");

        let mut store = MockStorage::new();
        store
            .expect_find_user_id()
            .returning(|_, _| Err(DatabaseError::ConnectionError("pool timed out".into())));
        let (status, body) = login_status(Arc::new(store)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }

    fn register_request(login: &str, password: &str, password2: &str) -> RegisterRequest {
        RegisterRequest {
            login: Some(login.into()),
            password: Some(password.into()),
            password2: Some(password2.into()),
        }
    }

    fn validation_message(result: Result<(String, String), AppError>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_validation_order() {
        let missing = RegisterRequest { login: None, password: None, password2: None };
        assert_eq!(validation_message(missing.validate(50.0)), "login is required");

        let req = register_request("ab", "Passwd@1", "Passwd@1");
        assert_eq!(validation_message(req.validate(50.0)), "login is too short");

        let long_password = format!("Aa1!{}", "x".repeat(60));
        let req = register_request("loginlogin", &long_password, &long_password);
        assert_eq!(validation_message(req.validate(50.0)), "password is too long");

        let req = register_request("loginlogin", "Passwd@1", "Passwd@2");
        assert_eq!(validation_message(req.validate(50.0)), "Entered passwords didn't match");

        let req = register_request("loginlogin", "somepassw", "somepassw");
        assert!(validation_message(req.validate(50.0)).starts_with("insecure password"));
    }

    #[test]
    fn test_register_normalizes_login() {
        let req = register_request("LoginLogin", "Passwd@1", "Passwd@1");
        let (login, password) = req.validate(50.0).unwrap();
        assert_eq!(login, "loginlogin");
        assert_eq!(password, "Passwd@1");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest { login: Some("alice".into()), password: None };
        assert_eq!(validation_message(req.validate()), "password is required");
    }
}
