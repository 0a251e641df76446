//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use cliply_core::error::CoreError;
use cliply_core::types::DbId;

use crate::auth::jwt::decode_access_token;
use crate::cookies::{self, ACCESS_TOKEN_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer `Authorization` header or
/// the `accessToken` cookie.
///
/// Use this as an extractor parameter in any handler that requires a
/// valid session:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = bearer
            .or_else(|| cookies::get_cookie(&parts.headers, ACCESS_TOKEN_COOKIE))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Unauthorized request".into()))
            })?;

        let claims = decode_access_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        })
    }
}
