use std::sync::Arc;

use crate::auth::provider::IdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: questlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Identity-provider capability used to verify bearer tokens.
    pub identity: Arc<dyn IdentityProvider>,
}
