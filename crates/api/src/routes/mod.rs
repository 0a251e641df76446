pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users/register         register (public, multipart)
/// /users/login            login (public)
/// /users/refresh-token    refresh (public)
/// /users/logout           logout (requires auth)
/// /users/change-password  change password (requires auth)
/// /users/current-user     current user (requires auth)
/// /users/update-account   patch account details (requires auth)
/// /users/avatar           replace avatar (requires auth, multipart)
/// /users/cover-image      replace cover image (requires auth, multipart)
/// /users/c/{username}     channel profile (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/users", users::router())
}
