use std::sync::Arc;

use petpals_cloud::ImageHost;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: petpals_db::DbPool,
    /// Server configuration (JWT settings, cookie flags, upload limits).
    pub config: Arc<ServerConfig>,
    /// Image hosting backend for profile and pet photos.
    pub images: Arc<dyn ImageHost>,
}
