use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::db::UserId;
use crate::error::{AppError, AuthError};

/// Turns an authenticated user id into the credential clients present on
/// every request, and back.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue(&self, user_id: UserId) -> Result<String, AppError>;

    async fn resolve(&self, credential: &str) -> Result<UserId, AuthError>;

    async fn revoke(&self, credential: &str) -> Result<(), AppError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

/// HS256-signed JWTs. Tokens carry everything needed to verify them, so
/// nothing is stored server side and `revoke` cannot invalidate a token
/// before it expires.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry,
        }
    }

    pub fn with_expiry_days(secret: &str, days: i64) -> Self {
        Self::new(secret, Duration::days(days))
    }

    fn generate_token(&self, user_id: UserId) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl SessionIssuer for JwtIssuer {
    async fn issue(&self, user_id: UserId) -> Result<String, AppError> {
        self.generate_token(user_id)
    }

    async fn resolve(&self, credential: &str) -> Result<UserId, AuthError> {
        self.decode_token(credential).map(|claims| claims.user_id)
    }

    async fn revoke(&self, _credential: &str) -> Result<(), AppError> {
        debug!("Signed tokens stay valid until they expire; nothing to revoke");
        Ok(())
    }
}
