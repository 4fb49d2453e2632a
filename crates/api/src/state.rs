use std::sync::Arc;

use vigraph_broker::Publisher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vigraph_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Broker publish handle, trait-typed so tests can substitute an
    /// in-memory double.
    pub publisher: Arc<dyn Publisher>,
}
