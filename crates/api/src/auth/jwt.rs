//! Access-token issuance and verification.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! same tokens authenticate plain HTTP requests and live-tracking WebSocket
//! upgrades.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workout_core::types::{DbId, Timestamp};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's internal database id. Tokens without it are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Reasons a presented token is refused. All of them surface as 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed token, bad signature, or wrong algorithm.
    #[error("Invalid token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
    #[error("Token does not identify a user")]
    MissingUserId,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 2160, i.e. 36 hours).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
pub const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 2160;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `2160`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Issue an HS256 access token for `user_id`, valid from now.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_access_token_at(user_id, config, Utc::now())
}

/// Issue an access token as if the current time were `now`.
///
/// `exp = now + access_token_expiry_mins`.
pub fn generate_access_token_at(
    user_id: DbId,
    config: &JwtConfig,
    now: Timestamp,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = now + Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        user_id: Some(user_id),
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify an access token and return the user id it carries.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<DbId, TokenError> {
    validate_token_at(token, config, Utc::now())
}

/// Verify an access token as if the current time were `now`.
///
/// Expiry is checked here rather than by `jsonwebtoken` so that it uses zero
/// leeway: a token whose `exp` is at or before `now` is expired.
pub fn validate_token_at(
    token: &str,
    config: &JwtConfig,
    now: Timestamp,
) -> Result<DbId, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        TokenError::Invalid
    })?;

    let claims = token_data.claims;
    if claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }

    claims.user_id.ok_or(TokenError::MissingUserId)
}
