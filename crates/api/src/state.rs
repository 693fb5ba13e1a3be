use std::sync::Arc;

use heist_core::outcome::FateSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: heist_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Draws post-heist member fates. Tests swap in a deterministic source.
    pub fate: Arc<dyn FateSource>,
}
