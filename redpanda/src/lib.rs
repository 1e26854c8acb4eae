//! Redpanda event publisher for the Slotwise platform.
//!
//! This crate provides a production-ready Kafka-compatible publisher that
//! implements the [`EventPublisher`] trait from `slotwise-core`, used by the
//! booking orchestrator to emit booking-completion events.
//!
//! # Why Redpanda?
//!
//! - **Kafka-compatible**: Uses the standard Kafka protocol, works with any
//!   Kafka-compatible system (Redpanda, Apache Kafka, AWS MSK, ...)
//! - **Simpler operations**: easier to deploy and operate than Kafka
//! - **Self-hostable**: Docker, Kubernetes, bare metal
//!
//! # Delivery Semantics
//!
//! Publication is fire-and-forget from the booking flow's point of view:
//! the orchestrator logs a failed publish and still reports the booking as
//! completed. Consumers therefore must tolerate missing events; consumer
//! behavior is outside this platform's scope.
//!
//! Payloads are JSON (see `slotwise-core::event`), so non-Rust consumers of
//! the topic can read them. Records are keyed by the event's partition key
//! (the booking id), which keeps events for one booking in order.
//!
//! # Example
//!
//! ```no_run
//! use slotwise_redpanda::RedpandaEventBus;
//! use slotwise_core::event_bus::EventPublisher;
//! use slotwise_core::event::SerializedEvent;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event_bus = RedpandaEventBus::new("localhost:9092")?;
//!
//! let event = SerializedEvent::new(
//!     "BookingCompleted.v1".to_string(),
//!     br#"{"booking_id":"..."}"#.to_vec(),
//!     Some("booking-1".to_string()),
//! );
//! event_bus.publish("booking-events", &event).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use slotwise_core::event::SerializedEvent;
use slotwise_core::event_bus::{EventBusError, EventPublisher};
use std::time::{Duration, Instant};

/// Kafka-compatible event publisher.
///
/// # Configuration
///
/// - **Broker addresses**: bootstrap servers (required)
/// - **Producer settings**: acks, compression, send timeout
///
/// # Example
///
/// ```no_run
/// use slotwise_redpanda::RedpandaEventBus;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Basic configuration
/// let event_bus = RedpandaEventBus::new("localhost:9092")?;
///
/// // Custom configuration
/// let event_bus = RedpandaEventBus::builder()
///     .brokers("localhost:9092,localhost:9093")
///     .producer_acks("all")  // Wait for all replicas
///     .compression("lz4")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RedpandaEventBus {
    /// Kafka producer for publishing events
    producer: FutureProducer,
    /// Broker addresses
    brokers: String,
    /// Producer send timeout
    timeout: Duration,
}

impl RedpandaEventBus {
    /// Create a new publisher with default configuration.
    ///
    /// # Parameters
    ///
    /// - `brokers`: Comma-separated list of broker addresses
    ///   (e.g., "localhost:9092")
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if the producer cannot
    /// be created from the configuration.
    pub fn new(brokers: &str) -> Result<Self, EventBusError> {
        Self::builder().brokers(brokers).build()
    }

    /// Create a new builder for configuring the publisher.
    #[must_use]
    pub fn builder() -> RedpandaEventBusBuilder {
        RedpandaEventBusBuilder::default()
    }

    /// Get a reference to the brokers string.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for configuring a [`RedpandaEventBus`].
#[derive(Default)]
pub struct RedpandaEventBusBuilder {
    brokers: Option<String>,
    producer_acks: Option<String>,
    compression: Option<String>,
    timeout: Option<Duration>,
}

impl RedpandaEventBusBuilder {
    /// Set the broker addresses.
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set the producer acknowledgment mode.
    ///
    /// # Parameters
    ///
    /// - `acks`: "0" (no acks), "1" (leader ack), "all" (all replicas ack)
    ///
    /// Default: "1"
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set the compression codec.
    ///
    /// # Parameters
    ///
    /// - `compression`: "none", "gzip", "snappy", "lz4", "zstd"
    ///
    /// Default: "none"
    #[must_use]
    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    /// Set the producer send timeout.
    ///
    /// Default: 5 seconds
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the [`RedpandaEventBus`].
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if:
    /// - Brokers not set
    /// - The producer cannot be created
    pub fn build(self) -> Result<RedpandaEventBus, EventBusError> {
        let brokers = self.brokers.ok_or_else(|| {
            EventBusError::ConnectionFailed("Brokers not configured".to_string())
        })?;

        // Create producer configuration
        let mut producer_config = ClientConfig::new();
        producer_config
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", self.producer_acks.as_deref().unwrap_or("1"))
            .set(
                "compression.type",
                self.compression.as_deref().unwrap_or("none"),
            );

        // Create producer
        let producer: FutureProducer = producer_config.create().map_err(|e| {
            EventBusError::ConnectionFailed(format!("Failed to create producer: {e}"))
        })?;

        tracing::info!(brokers = %brokers, "Redpanda producer created");

        Ok(RedpandaEventBus {
            producer,
            brokers,
            timeout: self.timeout.unwrap_or(Duration::from_secs(5)),
        })
    }
}

#[async_trait]
impl EventPublisher for RedpandaEventBus {
    async fn publish(&self, topic: &str, event: &SerializedEvent) -> Result<(), EventBusError> {
        let started = Instant::now();

        // Key by the event's partition key when present; events sharing a
        // key keep their relative order within the partition.
        let key = event
            .key
            .clone()
            .unwrap_or_else(|| event.event_type.clone());

        let record = FutureRecord::to(topic)
            .payload(&event.payload)
            .key(key.as_bytes());

        let send_result = self
            .producer
            .send(record, Timeout::After(self.timeout))
            .await;

        match send_result {
            Ok((partition, offset)) => {
                tracing::debug!(
                    topic = %topic,
                    partition = partition,
                    offset = offset,
                    event_type = %event.event_type,
                    "Event published successfully"
                );
                metrics::counter!("event_bus_messages_published_total").increment(1);
                metrics::histogram!("event_bus_publish_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                Ok(())
            }
            Err((kafka_error, _)) => {
                tracing::error!(
                    topic = %topic,
                    error = %kafka_error,
                    "Failed to publish event"
                );
                metrics::counter!("event_bus_publish_errors_total").increment(1);
                Err(EventBusError::PublishFailed {
                    topic: topic.to_string(),
                    reason: kafka_error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_brokers() {
        let result = RedpandaEventBus::builder().build();
        assert!(matches!(result, Err(EventBusError::ConnectionFailed(_))));
    }

    #[test]
    fn builder_accepts_custom_settings() {
        // Producer creation is local config validation; no broker needed.
        let result = RedpandaEventBus::builder()
            .brokers("localhost:9092")
            .producer_acks("all")
            .compression("lz4")
            .timeout(Duration::from_secs(10))
            .build();
        assert!(result.is_ok());
    }
}
