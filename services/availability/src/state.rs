//! Application state for the availability HTTP server.

use slotwise_clients::SlotGateway;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Read access to the parking service's open slots
    pub slots: Arc<dyn SlotGateway>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
