//! The session authority: credential verification, token-pair issuance
//! and rotation, logout invalidation.
//!
//! Free functions over `&PgPool` and `&JwtConfig` -- no HTTP types in or
//! out. The handlers translate the returned errors into responses.
//!
//! Session policy: at most one refresh token is valid per account at any
//! time. Every login and every refresh overwrites the stored token,
//! invalidating the previous one even before its stated expiry; logout
//! clears it. Two concurrent refreshes presenting the same token may both
//! rotate before either write lands -- an accepted narrow race under the
//! single-active-session design.

use sqlx::PgPool;

use cliply_core::error::CoreError;
use cliply_core::types::DbId;
use cliply_db::models::user::User;
use cliply_db::repositories::UserRepo;

use crate::auth::jwt::{
    decode_refresh_token, generate_access_token, generate_refresh_token, JwtConfig,
};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};

/// A freshly minted access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Verify a username-or-email + password credential.
///
/// Returns the matching account on success. No tokens are issued and no
/// state changes here; callers decide whether to start a session.
///
/// Errors: `NotFound` when no account matches either identifier,
/// `Unauthorized` on a password mismatch.
pub async fn authenticate(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
    password: &str,
) -> AppResult<User> {
    let user = UserRepo::find_by_username_or_email(pool, username, email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    Ok(user)
}

/// Mint a new access/refresh pair for the account and persist the refresh
/// token, superseding any previous one.
///
/// The persistence write is a narrow single-column UPDATE: it cannot fail
/// validation on unrelated fields, and it either fully applies or not at
/// all. Any codec or persistence failure surfaces as a 500-class error
/// with the prior token left intact.
pub async fn issue_token_pair(
    pool: &PgPool,
    user: &User,
    jwt: &JwtConfig,
) -> AppResult<TokenPair> {
    let access_token = generate_access_token(user.id, &user.username, &user.email, jwt)
        .map_err(|e| AppError::InternalError(format!("Access token generation error: {e}")))?;

    let refresh_token = generate_refresh_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Refresh token generation error: {e}")))?;

    let updated = UserRepo::set_refresh_token(pool, user.id, &refresh_token)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to persist refresh token: {e}")))?;

    if !updated {
        return Err(AppError::InternalError(
            "Failed to persist refresh token: account no longer exists".into(),
        ));
    }

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Exchange a presented refresh token for a new pair, rotating the stored
/// token.
///
/// The presented token must (1) carry a valid signature and be unexpired,
/// (2) reference an existing account, and (3) match the stored value
/// byte-for-byte -- a structurally valid but superseded token is rejected
/// before its stated expiry. Each of the three failures is
/// `Unauthorized`; no partial trust.
pub async fn refresh_session(
    pool: &PgPool,
    presented: &str,
    jwt: &JwtConfig,
) -> AppResult<(TokenPair, User)> {
    let claims = decode_refresh_token(presented, jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid refresh token".into()))
    })?;

    let user = UserRepo::find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid refresh token".into())))?;

    // Revocation check: the stored value is the source of truth.
    match user.refresh_token.as_deref() {
        Some(stored) if stored == presented => {}
        _ => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Refresh token is expired or used".into(),
            )));
        }
    }

    let pair = issue_token_pair(pool, &user, jwt).await?;
    Ok((pair, user))
}

/// End the account's session by clearing the stored refresh token.
/// Idempotent: logging out an already-logged-out account succeeds.
pub async fn logout(pool: &PgPool, user_id: DbId) -> AppResult<()> {
    UserRepo::clear_refresh_token(pool, user_id).await?;
    Ok(())
}
