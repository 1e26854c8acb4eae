//! # Slotwise Testing
//!
//! Testing utilities and in-memory doubles for the Slotwise platform.
//!
//! This crate provides:
//! - Mock implementations of environment traits (`FixedClock`)
//! - In-memory repositories with the same semantics as the Postgres ones
//! - A recording event publisher
//! - Scripted doubles for the cross-service client traits
//!
//! ## Example
//!
//! ```ignore
//! use slotwise_testing::{test_clock, InMemoryBookingRepository, ScriptedPaymentGateway, PaymentScript};
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let bookings = Arc::new(InMemoryBookingRepository::new());
//!     let payments = Arc::new(ScriptedPaymentGateway::new(PaymentScript::Complete));
//!     let orchestrator = BookingOrchestrator::new(bookings, payments, /* ... */);
//!
//!     let outcome = orchestrator.create_booking(request).await.unwrap();
//!     assert_eq!(outcome, BookingOutcome::Completed { .. });
//! }
//! ```

pub mod clients;
pub mod event_bus;
pub mod repositories;

use chrono::{DateTime, Utc};
use slotwise_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use slotwise_testing::mocks::FixedClock;
    /// use slotwise_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use clients::{
    InMemoryUserLedger, PaymentScript, RecordingSlotGateway, ScriptedPaymentGateway,
    StaticBookings,
};
pub use event_bus::InMemoryEventPublisher;
pub use mocks::{test_clock, FixedClock};
pub use repositories::{
    InMemoryBookingRepository, InMemoryParkingSlotRepository, InMemoryPaymentRepository,
    InMemoryUserRepository,
};

#[cfg(test)]
mod tests {
    use super::*;
    use slotwise_core::repository::UserRepository;
    use slotwise_core::{Money, TransferOutcome, User, UserId, UserRole};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    fn user(email: &str, balance: &str) -> User {
        User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: "salt$digest".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Customer,
            payment_method: None,
            balance: Money::parse(balance).unwrap_or_else(|_| Money::zero()),
        }
    }

    #[tokio::test]
    async fn transfer_moves_both_balances_together() {
        let repo = InMemoryUserRepository::new();
        let payer = repo.seed(user("payer@example.com", "50")).await;
        let receiver = repo.seed(user("landlord@example.com", "0")).await;

        let amount = Money::parse("30").unwrap_or_else(|_| Money::zero());
        let outcome = repo.transfer(payer, receiver, amount).await;
        assert!(matches!(outcome, Ok(TransferOutcome::Completed)));

        let payer_balance = repo.balance_of(payer).await.ok().flatten();
        let receiver_balance = repo.balance_of(receiver).await.ok().flatten();
        assert_eq!(payer_balance, Money::parse("20").ok());
        assert_eq!(receiver_balance, Money::parse("30").ok());
    }

    #[tokio::test]
    async fn transfer_declines_without_touching_balances() {
        let repo = InMemoryUserRepository::new();
        let payer = repo.seed(user("payer@example.com", "5")).await;
        let receiver = repo.seed(user("landlord@example.com", "0")).await;

        let amount = Money::parse("30").unwrap_or_else(|_| Money::zero());
        let outcome = repo.transfer(payer, receiver, amount).await;
        assert!(matches!(outcome, Ok(TransferOutcome::InsufficientFunds)));

        assert_eq!(repo.balance_of(payer).await.ok().flatten(), Money::parse("5").ok());
        assert_eq!(
            repo.balance_of(receiver).await.ok().flatten(),
            Money::parse("0").ok()
        );
    }
}
