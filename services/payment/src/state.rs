//! Application state for the payment HTTP server.

use crate::processor::PaymentProcessor;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Payment decision logic
    pub processor: Arc<PaymentProcessor>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
