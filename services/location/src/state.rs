//! Application state for the location HTTP server.

use crate::geocode::Geocoder;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Geocoding provider
    pub geocoder: Arc<dyn Geocoder>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
