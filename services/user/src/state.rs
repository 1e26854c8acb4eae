//! Application state for the user HTTP server.

use slotwise_core::repository::UserRepository;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// User store
    pub users: Arc<dyn UserRepository>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
