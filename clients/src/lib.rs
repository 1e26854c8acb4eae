//! Typed HTTP clients for cross-service calls.
//!
//! Every collaborator a service talks to is abstracted behind a trait
//! (`BookingDirectory`, `UserLedger`, `SlotGateway`, `PaymentGateway`) with
//! a reqwest-backed implementation here and in-memory doubles in
//! `slotwise-testing`. Services hold `Arc<dyn Trait>` so their logic is
//! testable without a network.
//!
//! Transport failures and 5xx responses surface as
//! [`ClientError::Unavailable`], which callers keep distinct from domain
//! outcomes such as a declined payment: "the downstream said no" and "the
//! downstream is unreachable" are different answers.
//!
//! # Example
//!
//! ```no_run
//! use slotwise_clients::{ClientConfig, HttpUserLedger, UserLedger};
//! use slotwise_core::{Money, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = HttpUserLedger::new(ClientConfig::new("http://localhost:8083"))?;
//! let balance = ledger.balance_of(UserId::new()).await?;
//! println!("balance: {balance}");
//! # Ok(())
//! # }
//! ```

pub mod bookings;
pub mod error;
pub mod payments;
pub mod slots;
pub mod users;

use std::time::Duration;

pub use bookings::{BookingDirectory, HttpBookingDirectory};
pub use error::ClientError;
pub use payments::{HttpPaymentGateway, PaymentDecision, PaymentGateway};
pub use slots::{HttpSlotGateway, SlotGateway};
pub use users::{HttpUserLedger, UserLedger};

/// Configuration for one HTTP client.
///
/// The original services left WebClient timeouts implicit; here every
/// cross-service call carries explicit connect and request timeouts.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the collaborator, e.g. `http://localhost:8083`
    pub base_url: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// End-to-end request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with the default timeouts (10 s connect, 30 s
    /// request).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Override the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ClientError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_carries_default_timeouts() {
        let config = ClientConfig::new("http://localhost:8083");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_timeouts_are_overridable() {
        let config = ClientConfig::new("http://localhost:8083")
            .connect_timeout(Duration::from_secs(1))
            .request_timeout(Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
