//! Domain events published by the platform.
//!
//! Events represent facts about things that have happened and are immutable.
//! They are serialized to JSON before hitting the broker so that non-Rust
//! consumers of the topic can read them.
//!
//! # Event Naming Convention
//!
//! `event_type()` returns a stable string identifier with a version suffix
//! (`"BookingCompleted.v1"`), which allows schemas to evolve without
//! breaking consumers.

use crate::types::{BookingId, Money, SlotId, TimeWindow, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from event serialization.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize event to bytes.
    #[error("Failed to serialize event: {0}")]
    Serialization(String),

    /// Failed to deserialize event from bytes.
    #[error("Failed to deserialize event: {0}")]
    Deserialization(String),
}

/// A serialized event ready for the broker: type tag, JSON payload and an
/// optional partition key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedEvent {
    /// Stable versioned type identifier, e.g. `"BookingCompleted.v1"`
    pub event_type: String,
    /// JSON-encoded payload
    pub payload: Vec<u8>,
    /// Partition key; events sharing a key keep their relative order
    pub key: Option<String>,
}

impl SerializedEvent {
    /// Creates a serialized event.
    #[must_use]
    pub const fn new(event_type: String, payload: Vec<u8>, key: Option<String>) -> Self {
        Self {
            event_type,
            payload,
            key,
        }
    }
}

/// An event that can be published to the broker.
pub trait DomainEvent: Serialize {
    /// Stable versioned type identifier.
    fn event_type(&self) -> &'static str;

    /// Partition key for ordering; defaults to none.
    fn partition_key(&self) -> Option<String> {
        None
    }

    /// Serialize into a broker-ready envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Serialization`] if JSON encoding fails.
    fn to_serialized(&self) -> Result<SerializedEvent, EventError> {
        let payload =
            serde_json::to_vec(self).map_err(|e| EventError::Serialization(e.to_string()))?;
        Ok(SerializedEvent::new(
            self.event_type().to_string(),
            payload,
            self.partition_key(),
        ))
    }
}

/// Published after a booking's payment completed and its slot was closed.
///
/// Carries everything an asynchronous consumer needs to react to the
/// completed booking without calling back into the orchestrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingCompleted {
    /// The completed booking
    pub booking_id: BookingId,
    /// Customer who paid
    pub customer_id: UserId,
    /// Landlord who was credited
    pub landlord_id: UserId,
    /// The slot that was closed
    pub parking_slot_id: SlotId,
    /// Hourly price the charge was computed from
    pub price_per_hour: Money,
    /// Reserved window
    pub window: TimeWindow,
}

impl DomainEvent for BookingCompleted {
    fn event_type(&self) -> &'static str {
        "BookingCompleted.v1"
    }

    fn partition_key(&self) -> Option<String> {
        Some(self.booking_id.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn booking_completed_round_trips_through_json() {
        let event = BookingCompleted {
            booking_id: BookingId::new(),
            customer_id: UserId::new(),
            landlord_id: UserId::new(),
            parking_slot_id: SlotId::new(),
            price_per_hour: Money::parse("10").unwrap(),
            window: TimeWindow::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )
            .unwrap(),
        };

        let serialized = event.to_serialized().unwrap();
        assert_eq!(serialized.event_type, "BookingCompleted.v1");
        assert_eq!(serialized.key.as_deref(), Some(event.booking_id.to_string().as_str()));

        let back: BookingCompleted = serde_json::from_slice(&serialized.payload).unwrap();
        assert_eq!(back, event);
    }
}
