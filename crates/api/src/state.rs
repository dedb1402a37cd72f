use std::sync::Arc;

use carlot_db::CarStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Car persistence. PostgreSQL in production, in-memory in tests.
    pub store: Arc<dyn CarStore>,
}
