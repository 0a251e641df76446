//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST  /register         -> register (multipart)
/// POST  /login            -> login
/// POST  /refresh-token    -> refresh
/// POST  /logout           -> logout (requires auth)
/// POST  /change-password  -> change_password (requires auth)
/// GET   /current-user     -> current_user (requires auth)
/// PATCH /update-account   -> update_account (requires auth)
/// PATCH /avatar           -> update_avatar (requires auth, multipart)
/// PATCH /cover-image      -> update_cover_image (requires auth, multipart)
/// GET   /c/{username}     -> channel_profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh-token", post(users::refresh))
        .route("/logout", post(users::logout))
        .route("/change-password", post(users::change_password))
        .route("/current-user", get(users::current_user))
        .route("/update-account", patch(users::update_account))
        .route("/avatar", patch(users::update_avatar))
        .route("/cover-image", patch(users::update_cover_image))
        .route("/c/{username}", get(users::channel_profile))
}
