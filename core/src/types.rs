//! Domain types for the Slotwise parking-reservation platform.
//!
//! This module contains the value objects and entities shared by every
//! service: identifiers, money, time windows, and the booking, payment,
//! user and parking-slot records they compose into.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a booking
    BookingId
}

uuid_id! {
    /// Unique identifier for a payment ledger row
    PaymentId
}

uuid_id! {
    /// Unique identifier for a user (customer or landlord)
    UserId
}

uuid_id! {
    /// Unique identifier for a parking slot
    SlotId
}

uuid_id! {
    /// Unique identifier for a parking restriction
    RestrictionId
}

// ============================================================================
// Money
// ============================================================================

/// Monetary amount with decimal precision.
///
/// Wraps [`rust_decimal::Decimal`] and serializes as a decimal string
/// (`"30"`, `"12.50"`), which is the wire format every service exchanges
/// balances and prices in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Creates a `Money` from a raw decimal.
    #[must_use]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parses a decimal string such as `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRequest`] if the string is not a valid
    /// decimal number.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        s.parse::<Decimal>()
            .map(Self)
            .map_err(|_| DomainError::InvalidRequest(format!("not a decimal amount: {s}")))
    }

    /// Get the inner decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// True if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// True if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply an hourly price by a whole number of hours.
    #[must_use]
    pub fn times_hours(self, hours: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(hours)).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Time windows
// ============================================================================

/// Half-open reservation window `[from, until)`.
///
/// The booking invariant `from < until` is enforced at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start
    pub from: DateTime<Utc>,
    /// Window end
    pub until: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window, rejecting `from >= until`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRequest`] when the window is empty or
    /// inverted.
    pub fn new(from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self, DomainError> {
        if from >= until {
            return Err(DomainError::InvalidRequest(
                "time window must satisfy from < until".to_string(),
            ));
        }
        Ok(Self { from, until })
    }

    /// Whole hours spanned by the window, truncated toward zero.
    ///
    /// Charging policy: partial hours are not prorated and never rounded
    /// up. A 2 h 59 m window is charged as 2 hours; a 45 m window as 0.
    #[must_use]
    pub fn whole_hours(&self) -> i64 {
        (self.until - self.from).num_hours()
    }

    /// True when two windows share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from < other.until && other.from < self.until
    }
}

// ============================================================================
// Statuses
// ============================================================================

/// Lifecycle of a booking as seen by the orchestration saga.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Persisted, payment not yet settled
    Pending,
    /// Payment completed and slot closed
    Confirmed,
    /// Compensated after a declined payment or downstream failure
    Cancelled,
}

/// Outcome recorded on a payment ledger row. Terminal per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payer balance covered the charge; funds moved
    Completed,
    /// Insufficient balance; no funds moved
    Declined,
    /// Compensating reversal of an earlier completed payment
    Refunded,
}

/// Occupancy state of a parking slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Available for booking
    Open,
    /// Reserved or otherwise unavailable
    Closed,
}

/// Role a user account carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Books parking slots
    Customer,
    /// Owns parking slots and receives payments
    Landlord,
    /// Platform operator
    Admin,
}

/// Result of an atomic two-party balance transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferOutcome {
    /// Payer debited and receiver credited in one transaction
    Completed,
    /// Payer balance did not cover the amount; nothing moved
    InsufficientFunds,
}

// ============================================================================
// Entities
// ============================================================================

/// A booking of one parking slot for one time window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Customer paying for the slot
    pub customer_id: UserId,
    /// Landlord owning the slot
    pub landlord_id: UserId,
    /// The reserved slot
    pub parking_slot_id: SlotId,
    /// Hourly price agreed at booking time
    pub price_per_hour: Money,
    /// Reserved window
    pub window: TimeWindow,
    /// Saga-visible lifecycle state
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Total charge for this booking: hourly price times truncated whole
    /// hours.
    #[must_use]
    pub fn charge(&self) -> Option<Money> {
        self.price_per_hour.times_hours(self.window.whole_hours())
    }
}

/// Append-only payment ledger row. One row per payment decision; refunds
/// are recorded as new rows, never as mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Ledger row identifier
    pub id: PaymentId,
    /// Debited party
    pub payer_id: UserId,
    /// Credited party
    pub receiver_id: UserId,
    /// Booking the charge was computed for
    pub booking_id: BookingId,
    /// When the decision was recorded
    pub recorded_at: DateTime<Utc>,
    /// Computed charge; recorded even when declined
    pub amount: Money,
    /// Decision outcome
    pub status: PaymentStatus,
}

/// A platform user: customer, landlord or admin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Unique email address
    pub email: String,
    /// Salted SHA-256 password hash, `{salt_hex}${digest_hex}`
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Account role
    pub role: UserRole,
    /// Free-form payment method label
    pub payment_method: Option<String>,
    /// Current monetary balance
    pub balance: Money,
}

/// Short free-form vehicle category label, e.g. `"SUV"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarCategory(String);

impl CarCategory {
    /// Creates a category label, rejecting empty or overlong values.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRequest`] for an empty label or one
    /// longer than 20 characters.
    pub fn new(label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into();
        if label.is_empty() || label.len() > 20 {
            return Err(DomainError::InvalidRequest(
                "car category must be 1-20 characters".to_string(),
            ));
        }
        Ok(Self(label))
    }

    /// The label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A restriction forbidding one car category from a slot during a window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingRestriction {
    /// Restriction identifier
    pub id: RestrictionId,
    /// When the restriction applies
    pub window: TimeWindow,
    /// Restricted category
    pub car_category: CarCategory,
    /// Municipal or landlord-defined restriction code
    pub code: String,
}

/// A bookable parking slot owned by a landlord.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingSlot {
    /// Slot identifier
    pub id: SlotId,
    /// Owning landlord
    pub landlord_id: UserId,
    /// Occupancy state
    pub status: SlotStatus,
    /// Hourly price
    pub price_per_hour: Money,
    /// Restrictions attached to the slot
    pub restrictions: Vec<ParkingRestriction>,
}

/// WGS-84 coordinates returned by the location service.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// A geocoded street address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// Coordinates of the address
    pub point: GeoPoint,
    /// Canonical formatted address as reported by the geocoder
    pub formatted: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn window_rejects_inverted_range() {
        let from = utc(2024, 5, 1, 12, 0);
        let until = utc(2024, 5, 1, 10, 0);
        assert!(TimeWindow::new(from, until).is_err());
        assert!(TimeWindow::new(from, from).is_err());
    }

    #[test]
    fn whole_hours_truncates() {
        let window = TimeWindow::new(utc(2024, 5, 1, 10, 0), utc(2024, 5, 1, 12, 59)).unwrap();
        assert_eq!(window.whole_hours(), 2);

        let short = TimeWindow::new(utc(2024, 5, 1, 10, 0), utc(2024, 5, 1, 10, 45)).unwrap();
        assert_eq!(short.whole_hours(), 0);
    }

    #[test]
    fn charge_is_price_times_truncated_hours() {
        let booking = Booking {
            id: BookingId::new(),
            customer_id: UserId::new(),
            landlord_id: UserId::new(),
            parking_slot_id: SlotId::new(),
            price_per_hour: Money::parse("10").unwrap(),
            window: TimeWindow::new(utc(2024, 5, 1, 9, 0), utc(2024, 5, 1, 12, 0)).unwrap(),
            status: BookingStatus::Pending,
            created_at: utc(2024, 5, 1, 8, 0),
        };
        assert_eq!(booking.charge().unwrap(), Money::parse("30").unwrap());
    }

    #[test]
    fn money_round_trips_as_decimal_string() {
        let money = Money::parse("12.50").unwrap();
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"12.50\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }

    #[test]
    fn money_rejects_garbage() {
        assert!(Money::parse("ten dollars").is_err());
    }

    #[test]
    fn car_category_bounds() {
        assert!(CarCategory::new("SUV").is_ok());
        assert!(CarCategory::new("").is_err());
        assert!(CarCategory::new("a".repeat(21)).is_err());
    }

    #[test]
    fn overlap_is_symmetric_and_open_ended() {
        let a = TimeWindow::new(utc(2024, 5, 1, 10, 0), utc(2024, 5, 1, 12, 0)).unwrap();
        let b = TimeWindow::new(utc(2024, 5, 1, 11, 0), utc(2024, 5, 1, 13, 0)).unwrap();
        let c = TimeWindow::new(utc(2024, 5, 1, 12, 0), utc(2024, 5, 1, 13, 0)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // touching boundaries do not overlap
        assert!(!a.overlaps(&c));
    }

    proptest! {
        #[test]
        fn whole_hours_never_rounds_up(minutes in 1i64..10_000) {
            let from = utc(2024, 1, 1, 0, 0);
            let until = from + chrono::Duration::minutes(minutes);
            let window = TimeWindow::new(from, until).unwrap();
            let hours = window.whole_hours();
            prop_assert!(hours * 60 <= minutes);
            prop_assert!((hours + 1) * 60 > minutes);
        }

        #[test]
        fn times_hours_matches_decimal_multiplication(price in 0u64..100_000, hours in 0i64..1000) {
            let money = Money::from_decimal(Decimal::from(price) / Decimal::from(100));
            let total = money.times_hours(hours).unwrap();
            prop_assert_eq!(
                total.as_decimal(),
                money.as_decimal() * Decimal::from(hours)
            );
        }
    }
}
