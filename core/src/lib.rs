//! # Slotwise Core
//!
//! Domain model and core abstractions for the Slotwise parking-reservation
//! platform.
//!
//! This crate is shared by every service and holds:
//!
//! - **Types**: identifiers, [`Money`](types::Money),
//!   [`TimeWindow`](types::TimeWindow) and the booking / payment / user /
//!   parking-slot entities
//! - **Errors**: the [`DomainError`](error::DomainError) surfaced by
//!   repositories and services
//! - **Repositories**: storage traits implemented by `slotwise-postgres`
//!   (production) and `slotwise-testing` (in-memory)
//! - **Events**: the [`BookingCompleted`](event::BookingCompleted) event and
//!   the [`EventPublisher`](event_bus::EventPublisher) trait
//! - **Environment**: the [`Clock`](environment::Clock) trait so time is
//!   injectable and tests are deterministic
//!
//! Services never talk to a backend directly; they depend on the traits in
//! this crate and get the concrete implementation injected at startup.

pub mod error;
pub mod event;
pub mod event_bus;
pub mod repository;
pub mod types;

/// Injected environment dependencies.
///
/// External dependencies that make code hard to test — currently just the
/// clock — are abstracted behind traits and handed to services at
/// construction time.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    pub trait Clock: Send + Sync {
        /// Get the current time.
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

pub use error::DomainError;
pub use event::{BookingCompleted, DomainEvent, SerializedEvent};
pub use event_bus::{EventBusError, EventPublisher};
pub use types::{
    Booking, BookingId, BookingStatus, CarCategory, GeoPoint, GeocodedAddress, Money, ParkingSlot,
    ParkingRestriction, Payment, PaymentId, PaymentStatus, RestrictionId, SlotId, SlotStatus,
    TimeWindow, TransferOutcome, User, UserId, UserRole,
};
