//! Token-based authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use workout_core::error::CoreError;
use workout_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from an access token.
///
/// The token is read from `Authorization: Bearer <token>`. Browser WebSocket
/// clients cannot set headers, so a `?token=<token>` query parameter is
/// accepted when the header is absent.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from the token's `user_id` claim).
    pub user_id: DbId,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get("authorization") {
            Some(value) => {
                let header = value.to_str().map_err(|_| {
                    AppError::Core(CoreError::Unauthorized(
                        "Invalid Authorization header".into(),
                    ))
                })?;
                header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| {
                        AppError::Core(CoreError::Unauthorized(
                            "Invalid Authorization format. Expected: Bearer <token>".into(),
                        ))
                    })?
                    .to_string()
            }
            None => Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.token)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized(
                        "Missing Authorization header".into(),
                    ))
                })?,
        };

        let user_id = validate_token(&token, &state.config.jwt)?;

        Ok(AuthUser { user_id })
    }
}
