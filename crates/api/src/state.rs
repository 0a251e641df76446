use std::sync::Arc;

use cliply_media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cliply_db::DbPool,
    /// Server configuration (JWT secrets, limits, CORS).
    pub config: Arc<ServerConfig>,
    /// Media upload collaborator. A trait object so tests can substitute
    /// an in-memory store.
    pub media: Arc<dyn MediaStore>,
}
