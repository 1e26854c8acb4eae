//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for the platform services:
//! - Booking orchestration outcomes
//! - Payment decisions and refunds
//! - Event bus publishes
//! - Circuit breaker activity
//!
//! # Example
//!
//! ```rust,no_run
//! use slotwise_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Install the Prometheus recorder for this process
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Render via server.render() from a /metrics handler
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
    /// Failed to bind HTTP server
    #[error("Failed to bind metrics server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Prometheus metrics recorder for one service process.
///
/// Installs the process-wide recorder; the rendered text is exposed from
/// each service's `/metrics` route via [`MetricsServer::render`].
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address the scrape endpoint is advertised on
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Initialize metric descriptions and install the recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the metrics exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a metrics recorder is already installed (e.g., in tests), this
    /// is tolerated: the existing recorder keeps collecting.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        // Register all metric descriptions
        register_metrics();

        // Build and install the Prometheus exporter
        let builder = PrometheusBuilder::new()
            // Configure histogram buckets for latency measurements
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!(
                    addr = %self.addr,
                    "Metrics recorder installed - scrape at http://{}/metrics",
                    self.addr
                );
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Booking orchestration metrics
    describe_counter!(
        "bookings_completed_total",
        "Total number of bookings that completed payment and closed their slot"
    );
    describe_counter!(
        "bookings_rejected_total",
        "Total number of bookings rejected because payment was declined"
    );
    describe_counter!(
        "bookings_failed_total",
        "Total number of bookings cancelled by a downstream failure"
    );
    describe_histogram!(
        "booking_orchestration_duration_seconds",
        "Wall time of the create-booking saga"
    );

    // Payment metrics
    describe_counter!(
        "payments_completed_total",
        "Total number of completed payments"
    );
    describe_counter!(
        "payments_declined_total",
        "Total number of declined payments"
    );
    describe_counter!(
        "payments_refunded_total",
        "Total number of compensating refunds"
    );

    // Event bus metrics
    describe_counter!(
        "event_bus_messages_published_total",
        "Total number of messages published to the event bus"
    );
    describe_counter!(
        "event_bus_publish_errors_total",
        "Total number of publish errors"
    );
    describe_histogram!(
        "event_bus_publish_duration_seconds",
        "Time taken to publish messages"
    );

    // Circuit breaker metrics
    describe_counter!(
        "circuit_breaker_rejections_total",
        "Total number of rejected calls (circuit open)"
    );
}

/// Booking orchestration metrics recorder.
pub struct BookingMetrics;

impl BookingMetrics {
    /// Record a completed booking.
    pub fn record_completed(duration: Duration) {
        counter!("bookings_completed_total").increment(1);
        histogram!("booking_orchestration_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a booking rejected by payment policy.
    pub fn record_rejected() {
        counter!("bookings_rejected_total").increment(1);
    }

    /// Record a booking cancelled by a downstream failure.
    pub fn record_failed() {
        counter!("bookings_failed_total").increment(1);
    }
}

/// Payment ledger metrics recorder.
pub struct PaymentMetrics;

impl PaymentMetrics {
    /// Record a completed payment.
    pub fn record_completed() {
        counter!("payments_completed_total").increment(1);
    }

    /// Record a declined payment.
    pub fn record_declined() {
        counter!("payments_declined_total").increment(1);
    }

    /// Record a compensating refund.
    pub fn record_refunded() {
        counter!("payments_refunded_total").increment(1);
    }
}

/// Event bus metrics recorder.
pub struct EventBusMetrics;

impl EventBusMetrics {
    /// Record a message publish.
    pub fn record_publish(duration: Duration) {
        counter!("event_bus_messages_published_total").increment(1);
        histogram!("event_bus_publish_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a publish error.
    pub fn record_publish_error() {
        counter!("event_bus_publish_errors_total").increment(1);
    }
}
