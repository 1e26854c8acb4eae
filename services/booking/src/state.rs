//! Application state for the booking HTTP server.

use crate::orchestrator::BookingOrchestrator;
use slotwise_core::environment::Clock;
use slotwise_core::repository::BookingRepository;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;

/// Shared state handed to every handler.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The booking saga coordinator
    pub orchestrator: Arc<BookingOrchestrator>,
    /// Booking store for the plain CRUD endpoints
    pub bookings: Arc<dyn BookingRepository>,
    /// Clock used when overwriting rows
    pub clock: Arc<dyn Clock>,
    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}
