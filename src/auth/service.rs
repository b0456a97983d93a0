use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::auth::token::SessionIssuer;
use crate::db::{Store, UserId};
use crate::error::{AppError, AuthError, DatabaseError};

pub struct AuthService {
    store: Arc<dyn Store>,
    issuer: Arc<dyn SessionIssuer>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, issuer: Arc<dyn SessionIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Stores a new user. The login is folded to lowercase, so logins that
    /// differ only in case collide.
    pub async fn register(&self, login: &str, password: &str) -> Result<UserId, AppError> {
        let login = login.to_lowercase();

        match self.store.insert_user(&login, &hash_password(password)).await {
            Ok(id) => {
                info!("Registered user {} as {}", login, id);
                Ok(id)
            }
            Err(DatabaseError::Duplicate) => {
                warn!("Registration rejected, login {} is taken", login);
                Err(DatabaseError::Duplicate.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks the credentials and issues a token. Unknown logins and wrong
    /// passwords fail the same way.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<String, AppError> {
        let login = login.to_lowercase();

        let user_id = self
            .store
            .find_user_id(&login, &hash_password(password))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!("User {} authenticated", user_id);
        self.issuer.issue(user_id).await
    }

    pub async fn resolve(&self, credential: &str) -> Result<UserId, AuthError> {
        self.issuer.resolve(credential).await
    }

    pub async fn logout(&self, credential: &str) -> Result<(), AppError> {
        self.issuer.revoke(credential).await
    }
}
