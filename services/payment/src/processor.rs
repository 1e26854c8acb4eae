//! Payment decision logic.
//!
//! `make_payment` computes the charge for a booking and settles it as one
//! atomic transfer on the user store:
//!
//! 1. Fetch the booking from the booking service.
//! 2. Charge = hourly price x whole hours, hours truncated toward zero.
//!    No proration, never rounded up: a 2 h 59 m booking pays for 2 hours.
//! 3. Transfer payer -> landlord through the "user-ledger" breaker. The
//!    user store debits and credits in one transaction and answers
//!    `Completed` or `InsufficientFunds`.
//! 4. Append a ledger row for the decision - declined rows still carry the
//!    computed charge.
//!
//! When no decision was reached (booking or user service unreachable, or
//! the breaker is open) no ledger row is written and the error keeps the
//! outage visible instead of collapsing it into a decline.
//!
//! Per payment attempt the state machine is REQUESTED -> {COMPLETED |
//! DECLINED}, terminal either way; a declined payment is never retried.

use crate::config::DownstreamConfig;
use slotwise_clients::{BookingDirectory, ClientError, UserLedger};
use slotwise_core::environment::Clock;
use slotwise_core::repository::PaymentRepository;
use slotwise_core::{
    Booking, BookingId, DomainError, Payment, PaymentId, PaymentStatus, TransferOutcome,
};
use slotwise_runtime::circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerRegistry,
};
use slotwise_runtime::metrics::PaymentMetrics;
use std::sync::Arc;
use thiserror::Error;

/// Name of the circuit breaker guarding the user store.
pub const LEDGER_BREAKER: &str = "user-ledger";

/// Errors from payment processing.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The referenced booking does not exist.
    #[error("Booking with id {0} wasn't found")]
    BookingNotFound(BookingId),

    /// The referenced payment does not exist.
    #[error("Payment with id {0} wasn't found")]
    PaymentNotFound(PaymentId),

    /// One of the transfer parties does not exist.
    #[error("{0}")]
    UserNotFound(String),

    /// A collaborator is unreachable; no decision was reached.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        /// Logical service name
        service: &'static str,
        /// Failure detail
        reason: String,
    },

    /// Only completed payments can be refunded.
    #[error("payment {0} is not refundable")]
    NotRefundable(PaymentId),

    /// The receiver's balance no longer covers the refund.
    #[error("refund of payment {0} cannot be covered")]
    RefundNotCoverable(PaymentId),

    /// The charge computation overflowed.
    #[error("charge computation overflowed for booking {0}")]
    ChargeOverflow(BookingId),

    /// The ledger store failed.
    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl PaymentError {
    fn from_booking_lookup(e: ClientError, booking_id: BookingId) -> Self {
        match e {
            ClientError::NotFound { .. } => Self::BookingNotFound(booking_id),
            ClientError::Unavailable { service, reason } => Self::Unavailable { service, reason },
            other => Self::Unavailable {
                service: "booking-service",
                reason: other.to_string(),
            },
        }
    }
}

/// Computes charges and settles them against the user store.
pub struct PaymentProcessor {
    ledger: Arc<dyn PaymentRepository>,
    bookings: Arc<dyn BookingDirectory>,
    users: Arc<dyn UserLedger>,
    clock: Arc<dyn Clock>,
    ledger_breaker: CircuitBreaker,
}

impl PaymentProcessor {
    /// Wire up a processor. The "user-ledger" breaker comes from the
    /// shared registry so every processor in the process sees one failure
    /// history for the user store.
    pub fn new(
        ledger: Arc<dyn PaymentRepository>,
        bookings: Arc<dyn BookingDirectory>,
        users: Arc<dyn UserLedger>,
        clock: Arc<dyn Clock>,
        breakers: &CircuitBreakerRegistry,
        downstream: &DownstreamConfig,
    ) -> Self {
        let breaker_config = CircuitBreakerConfig::builder()
            .failure_rate_threshold(0.5)
            .cooldown(downstream.ledger_breaker_cooldown)
            .build();
        Self {
            ledger,
            bookings,
            users,
            clock,
            ledger_breaker: breakers.get_or_create(LEDGER_BREAKER, &breaker_config),
        }
    }

    /// Settle the charge for one booking.
    ///
    /// Returns the appended ledger row; its status is the decision.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::BookingNotFound`] for an unknown booking and
    /// [`PaymentError::Unavailable`] when no decision could be reached; in
    /// that case no ledger row is written.
    pub async fn make_payment(&self, booking_id: BookingId) -> Result<Payment, PaymentError> {
        let booking = self
            .bookings
            .booking(booking_id)
            .await
            .map_err(|e| PaymentError::from_booking_lookup(e, booking_id))?;

        let amount = Self::charge_for(&booking)?;

        let transfer = self
            .ledger_breaker
            .call(|| {
                self.users
                    .transfer(booking.customer_id, booking.landlord_id, amount)
            })
            .await;

        let status = match transfer {
            Ok(TransferOutcome::Completed) => PaymentStatus::Completed,
            Ok(TransferOutcome::InsufficientFunds) => PaymentStatus::Declined,
            Err(CircuitBreakerError::Open) => {
                return Err(PaymentError::Unavailable {
                    service: "user-service",
                    reason: "circuit breaker open".to_string(),
                });
            }
            Err(CircuitBreakerError::Inner(ClientError::NotFound { resource, id })) => {
                return Err(PaymentError::UserNotFound(format!(
                    "{resource} with id {id} wasn't found"
                )));
            }
            Err(CircuitBreakerError::Inner(e)) => {
                return Err(PaymentError::Unavailable {
                    service: "user-service",
                    reason: e.to_string(),
                });
            }
        };

        let payment = Payment {
            id: PaymentId::new(),
            payer_id: booking.customer_id,
            receiver_id: booking.landlord_id,
            booking_id,
            recorded_at: self.clock.now(),
            amount,
            status,
        };
        self.ledger.append(&payment).await?;

        match status {
            PaymentStatus::Completed => {
                PaymentMetrics::record_completed();
                tracing::info!(
                    payment_id = %payment.id,
                    booking_id = %booking_id,
                    amount = %amount,
                    "Payment completed"
                );
            }
            PaymentStatus::Declined => {
                PaymentMetrics::record_declined();
                tracing::info!(
                    payment_id = %payment.id,
                    booking_id = %booking_id,
                    amount = %amount,
                    "Payment declined: insufficient balance"
                );
            }
            PaymentStatus::Refunded => {}
        }

        Ok(payment)
    }

    /// Reverse an earlier completed payment (saga compensation).
    ///
    /// Appends a `REFUNDED` ledger row; the original row stays untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::PaymentNotFound`] for an unknown payment,
    /// [`PaymentError::NotRefundable`] when the row is not `COMPLETED`,
    /// and [`PaymentError::RefundNotCoverable`] when the receiver's
    /// balance no longer covers the amount.
    pub async fn refund(&self, payment_id: PaymentId) -> Result<Payment, PaymentError> {
        let original = self
            .ledger
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;

        if original.status != PaymentStatus::Completed {
            return Err(PaymentError::NotRefundable(payment_id));
        }

        // Reverse direction: the landlord pays the customer back.
        let transfer = self
            .ledger_breaker
            .call(|| {
                self.users
                    .transfer(original.receiver_id, original.payer_id, original.amount)
            })
            .await;

        match transfer {
            Ok(TransferOutcome::Completed) => {}
            Ok(TransferOutcome::InsufficientFunds) => {
                return Err(PaymentError::RefundNotCoverable(payment_id));
            }
            Err(CircuitBreakerError::Open) => {
                return Err(PaymentError::Unavailable {
                    service: "user-service",
                    reason: "circuit breaker open".to_string(),
                });
            }
            Err(CircuitBreakerError::Inner(e)) => {
                return Err(PaymentError::Unavailable {
                    service: "user-service",
                    reason: e.to_string(),
                });
            }
        }

        let refund = Payment {
            id: PaymentId::new(),
            payer_id: original.receiver_id,
            receiver_id: original.payer_id,
            booking_id: original.booking_id,
            recorded_at: self.clock.now(),
            amount: original.amount,
            status: PaymentStatus::Refunded,
        };
        self.ledger.append(&refund).await?;
        PaymentMetrics::record_refunded();
        tracing::info!(
            payment_id = %payment_id,
            refund_id = %refund.id,
            amount = %refund.amount,
            "Payment refunded"
        );
        Ok(refund)
    }

    /// Fetch one ledger row.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::PaymentNotFound`] when no row matches.
    pub async fn payment(&self, payment_id: PaymentId) -> Result<Payment, PaymentError> {
        self.ledger
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound(payment_id))
    }

    fn charge_for(booking: &Booking) -> Result<slotwise_core::Money, PaymentError> {
        booking
            .charge()
            .ok_or(PaymentError::ChargeOverflow(booking.id))
    }
}
