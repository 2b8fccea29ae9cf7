use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clienter_db::DbPool,
    /// Server configuration, including auth and reminder timing.
    pub config: Arc<ServerConfig>,
    /// Open reminder streams.
    pub ws_manager: Arc<WsManager>,
    /// Cancelled on graceful shutdown; each connection's reminder loop runs
    /// under a child token.
    pub shutdown: CancellationToken,
}
