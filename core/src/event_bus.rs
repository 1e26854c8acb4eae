//! Event publication abstraction.
//!
//! The orchestrator publishes booking-completion events to a named broker
//! topic for asynchronous consumers. Publication is fire-and-forget from the
//! caller's point of view: a failed publish is logged, never propagated into
//! the booking outcome. Consumer-side behavior is out of scope for this
//! platform.
//!
//! # Implementations
//!
//! - `InMemoryEventPublisher` (in `slotwise-testing`) — records events for
//!   assertions
//! - `RedpandaEventBus` (in `slotwise-redpanda`) — Kafka-compatible producer

use crate::event::SerializedEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while publishing events.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// Failed to connect to the broker
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to publish an event to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Invalid broker configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Publisher half of the event bus.
///
/// All implementations must be `Send + Sync`; handlers share one publisher
/// behind an `Arc<dyn EventPublisher>`.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event to a topic.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::PublishFailed`] when the broker rejects the
    /// record or the delivery times out.
    async fn publish(&self, topic: &str, event: &SerializedEvent) -> Result<(), EventBusError>;
}
