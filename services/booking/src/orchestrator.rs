//! Booking orchestration saga.
//!
//! `create_booking` drives the cross-service flow:
//!
//! ```text
//! persist Pending ──payment COMPLETED──▶ close slot ──▶ publish event ──▶ Confirmed
//!       │                  │
//!       │                  └─slot close failed─▶ refund payment ─▶ Cancelled
//!       ├──payment DECLINED────────▶ Cancelled   ("Payment rejected.")
//!       └──payment unreachable─────▶ Cancelled   (distinct outcome)
//! ```
//!
//! Every failure path runs its compensation before returning, so a booking
//! row never silently outlives a payment that did not settle. A declined
//! payment and an unreachable payment service are distinct outcomes: the
//! first is a policy answer, the second an infrastructure failure.
//!
//! The payment call goes through the process-wide "payment" circuit
//! breaker; while the breaker is open the saga takes the unreachable path
//! without touching the payment service.

use crate::config::DownstreamConfig;
use slotwise_clients::{ClientError, PaymentDecision, PaymentGateway, SlotGateway};
use slotwise_core::environment::Clock;
use slotwise_core::event::DomainEvent;
use slotwise_core::repository::BookingRepository;
use slotwise_core::{
    Booking, BookingCompleted, BookingId, BookingStatus, DomainError, EventPublisher, Money,
    PaymentId, SlotId, SlotStatus, TimeWindow, UserId,
};
use slotwise_runtime::circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerRegistry,
};
use slotwise_runtime::metrics::BookingMetrics;
use std::sync::Arc;
use std::time::Instant;

/// Name of the circuit breaker guarding the payment service.
pub const PAYMENT_BREAKER: &str = "payment";

/// Validated input for [`BookingOrchestrator::create_booking`].
#[derive(Clone, Debug)]
pub struct NewBooking {
    /// Customer paying for the slot
    pub customer_id: UserId,
    /// Landlord owning the slot
    pub landlord_id: UserId,
    /// The slot to reserve
    pub parking_slot_id: SlotId,
    /// Hourly price agreed at booking time
    pub price_per_hour: Money,
    /// Reserved window
    pub window: TimeWindow,
}

/// Terminal outcome of one booking attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Payment completed, slot closed, event published
    Completed {
        /// The confirmed booking
        booking_id: BookingId,
    },
    /// Payment declined by policy; booking cancelled
    PaymentRejected {
        /// The cancelled booking
        booking_id: BookingId,
    },
    /// Payment service unreachable or breaker open; booking cancelled
    PaymentUnavailable {
        /// The cancelled booking
        booking_id: BookingId,
    },
    /// Slot close failed after a completed payment; payment refunded,
    /// booking cancelled
    SlotUnavailable {
        /// The cancelled booking
        booking_id: BookingId,
    },
}

/// Coordinates booking persistence, payment, slot closure and event
/// publication.
pub struct BookingOrchestrator {
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentGateway>,
    slots: Arc<dyn SlotGateway>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    payment_breaker: CircuitBreaker,
    booking_topic: String,
}

impl BookingOrchestrator {
    /// Wire up an orchestrator.
    ///
    /// The payment breaker is fetched from (or created in) `breakers`, so
    /// every orchestrator in the process shares one failure history for
    /// the payment service.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentGateway>,
        slots: Arc<dyn SlotGateway>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        breakers: &CircuitBreakerRegistry,
        downstream: &DownstreamConfig,
        booking_topic: impl Into<String>,
    ) -> Self {
        let breaker_config = CircuitBreakerConfig::builder()
            .failure_rate_threshold(0.5)
            .cooldown(downstream.payment_breaker_cooldown)
            .build();
        Self {
            bookings,
            payments,
            slots,
            publisher,
            clock,
            payment_breaker: breakers.get_or_create(PAYMENT_BREAKER, &breaker_config),
            booking_topic: booking_topic.into(),
        }
    }

    /// Run the booking saga for one request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRequest`] for a malformed request and
    /// [`DomainError::Storage`] when the booking store itself fails. All
    /// downstream failures are encoded in the returned [`BookingOutcome`],
    /// never swallowed into a decline.
    pub async fn create_booking(&self, request: NewBooking) -> Result<BookingOutcome, DomainError> {
        let started = Instant::now();

        if request.price_per_hour.is_negative() {
            return Err(DomainError::InvalidRequest(
                "price per hour must not be negative".to_string(),
            ));
        }

        let booking = Booking {
            id: BookingId::new(),
            customer_id: request.customer_id,
            landlord_id: request.landlord_id,
            parking_slot_id: request.parking_slot_id,
            price_per_hour: request.price_per_hour,
            window: request.window,
            status: BookingStatus::Pending,
            created_at: self.clock.now(),
        };
        self.bookings.insert(&booking).await?;
        tracing::info!(booking_id = %booking.id, "Booking persisted, requesting payment");

        let decision = self
            .payment_breaker
            .call(|| self.payments.request_payment(booking.id))
            .await;

        match decision {
            Ok(PaymentDecision::Completed { payment_id }) => {
                self.settle_completed(&booking, payment_id, started).await
            }
            Ok(PaymentDecision::Declined) => {
                tracing::info!(booking_id = %booking.id, "Payment rejected, cancelling booking");
                self.cancel(booking.id).await?;
                BookingMetrics::record_rejected();
                Ok(BookingOutcome::PaymentRejected {
                    booking_id: booking.id,
                })
            }
            Err(CircuitBreakerError::Open) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    "Payment breaker open, cancelling booking"
                );
                self.cancel(booking.id).await?;
                BookingMetrics::record_failed();
                Ok(BookingOutcome::PaymentUnavailable {
                    booking_id: booking.id,
                })
            }
            Err(CircuitBreakerError::Inner(e)) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    error = %e,
                    "Payment service failed, cancelling booking"
                );
                self.cancel(booking.id).await?;
                BookingMetrics::record_failed();
                Ok(BookingOutcome::PaymentUnavailable {
                    booking_id: booking.id,
                })
            }
        }
    }

    /// Payment settled: close the slot, publish the completion event, and
    /// confirm - or compensate with a refund when the slot cannot close.
    async fn settle_completed(
        &self,
        booking: &Booking,
        payment_id: PaymentId,
        started: Instant,
    ) -> Result<BookingOutcome, DomainError> {
        if let Err(e) = self
            .slots
            .set_status(booking.parking_slot_id, SlotStatus::Closed)
            .await
        {
            tracing::error!(
                booking_id = %booking.id,
                error = %e,
                "Slot close failed after completed payment, refunding"
            );
            self.refund(payment_id).await;
            self.cancel(booking.id).await?;
            BookingMetrics::record_failed();
            return Ok(BookingOutcome::SlotUnavailable {
                booking_id: booking.id,
            });
        }

        self.publish_completed(booking).await;
        self.bookings
            .set_status(booking.id, BookingStatus::Confirmed)
            .await?;
        BookingMetrics::record_completed(started.elapsed());
        tracing::info!(booking_id = %booking.id, "Booking completed");
        Ok(BookingOutcome::Completed {
            booking_id: booking.id,
        })
    }

    /// Publish the completion event. Fire-and-forget: a publish failure is
    /// logged and the booking still completes.
    async fn publish_completed(&self, booking: &Booking) {
        let event = BookingCompleted {
            booking_id: booking.id,
            customer_id: booking.customer_id,
            landlord_id: booking.landlord_id,
            parking_slot_id: booking.parking_slot_id,
            price_per_hour: booking.price_per_hour,
            window: booking.window,
        };
        match event.to_serialized() {
            Ok(serialized) => {
                if let Err(e) = self.publisher.publish(&self.booking_topic, &serialized).await {
                    tracing::warn!(
                        booking_id = %booking.id,
                        error = %e,
                        "Failed to publish booking-completed event"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    error = %e,
                    "Failed to serialize booking-completed event"
                );
            }
        }
    }

    /// Compensation: refund a completed payment. Failures are logged; the
    /// payment row stays visible for manual follow-up.
    async fn refund(&self, payment_id: PaymentId) {
        if let Err(e) = self.payments.refund(payment_id).await {
            match e {
                ClientError::Unavailable { .. } => tracing::error!(
                    payment_id = %payment_id,
                    error = %e,
                    "Refund failed: payment service unavailable"
                ),
                _ => tracing::error!(payment_id = %payment_id, error = %e, "Refund failed"),
            }
        }
    }

    /// Compensation: cancel the persisted booking row.
    async fn cancel(&self, booking_id: BookingId) -> Result<(), DomainError> {
        self.bookings
            .set_status(booking_id, BookingStatus::Cancelled)
            .await
    }
}
