//! Application state for the parking HTTP server.

use slotwise_core::repository::ParkingSlotRepository;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Slot store
    pub slots: Arc<dyn ParkingSlotRepository>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
