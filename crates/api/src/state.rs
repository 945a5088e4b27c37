use std::sync::Arc;

use bazaar_events::NotificationDispatcher;

use crate::config::ServerConfig;
use crate::storage::ObjectStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bazaar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Sends notifications over the configured channels.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Upload target; `None` when storage is not configured.
    pub storage: Option<Arc<dyn ObjectStorage>>,
}
