//! Booking saga tests against in-memory doubles.
//!
//! Covers every terminal outcome of the orchestration flow: completed,
//! rejected, payment service down, slot close failure with refund, and the
//! breaker short-circuiting repeated failures.

#![allow(clippy::unwrap_used, clippy::panic)]

use booking_service::config::DownstreamConfig;
use booking_service::{BookingOrchestrator, BookingOutcome, NewBooking};
use chrono::{TimeZone, Utc};
use slotwise_core::repository::BookingRepository;
use slotwise_core::{BookingCompleted, BookingStatus, Money, SlotId, SlotStatus, TimeWindow, UserId};
use slotwise_runtime::circuit_breaker::CircuitBreakerRegistry;
use slotwise_testing::{
    test_clock, InMemoryBookingRepository, InMemoryEventPublisher, PaymentScript,
    RecordingSlotGateway, ScriptedPaymentGateway,
};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    orchestrator: BookingOrchestrator,
    bookings: Arc<InMemoryBookingRepository>,
    payments: Arc<ScriptedPaymentGateway>,
    slots: Arc<RecordingSlotGateway>,
    publisher: Arc<InMemoryEventPublisher>,
}

fn downstream_config() -> DownstreamConfig {
    DownstreamConfig {
        payment_base_url: "http://localhost:8087".to_string(),
        parking_base_url: "http://localhost:8084".to_string(),
        connect_timeout: Duration::from_secs(1),
        request_timeout: Duration::from_secs(1),
        payment_breaker_cooldown: Duration::from_secs(10),
    }
}

fn harness(script: PaymentScript) -> Harness {
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let payments = Arc::new(ScriptedPaymentGateway::new(script));
    let slots = Arc::new(RecordingSlotGateway::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());

    let orchestrator = BookingOrchestrator::new(
        bookings.clone(),
        payments.clone(),
        slots.clone(),
        publisher.clone(),
        Arc::new(test_clock()),
        &CircuitBreakerRegistry::new(),
        &downstream_config(),
        "booking-events",
    );

    Harness {
        orchestrator,
        bookings,
        payments,
        slots,
        publisher,
    }
}

fn three_hour_request() -> NewBooking {
    let from = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let until = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    NewBooking {
        customer_id: UserId::new(),
        landlord_id: UserId::new(),
        parking_slot_id: SlotId::new(),
        price_per_hour: Money::parse("10").unwrap(),
        window: TimeWindow::new(from, until).unwrap(),
    }
}

#[tokio::test]
async fn completed_payment_closes_slot_publishes_event_and_confirms() {
    let h = harness(PaymentScript::Complete);
    let request = three_hour_request();
    let slot_id = request.parking_slot_id;

    let outcome = h.orchestrator.create_booking(request).await.unwrap();

    let BookingOutcome::Completed { booking_id } = outcome else {
        panic!("expected completed outcome, got {outcome:?}");
    };

    // Booking confirmed
    let booking = h.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);

    // Slot closed exactly once
    assert_eq!(
        h.slots.status_changes().await,
        vec![(slot_id, SlotStatus::Closed)]
    );

    // Exactly one completion event on the topic
    let published = h.publisher.published().await;
    assert_eq!(published.len(), 1);
    let (topic, event) = &published[0];
    assert_eq!(topic, "booking-events");
    assert_eq!(event.event_type, "BookingCompleted.v1");
    let payload: BookingCompleted = serde_json::from_slice(&event.payload).unwrap();
    assert_eq!(payload.booking_id, booking_id);
    assert_eq!(payload.price_per_hour, Money::parse("10").unwrap());
}

#[tokio::test]
async fn declined_payment_cancels_booking_without_side_effects() {
    let h = harness(PaymentScript::Decline);

    let outcome = h
        .orchestrator
        .create_booking(three_hour_request())
        .await
        .unwrap();

    let BookingOutcome::PaymentRejected { booking_id } = outcome else {
        panic!("expected rejected outcome, got {outcome:?}");
    };

    // Booking kept for audit but cancelled
    let booking = h.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);

    // Neither the slot nor the topic was touched
    assert!(h.slots.status_changes().await.is_empty());
    assert!(h.publisher.published().await.is_empty());
}

#[tokio::test]
async fn unreachable_payment_service_is_not_a_decline() {
    let h = harness(PaymentScript::Unavailable);

    let outcome = h
        .orchestrator
        .create_booking(three_hour_request())
        .await
        .unwrap();

    // Distinct outcome: infrastructure failure, not a policy decline
    let BookingOutcome::PaymentUnavailable { booking_id } = outcome else {
        panic!("expected unavailable outcome, got {outcome:?}");
    };

    let booking = h.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert!(h.slots.status_changes().await.is_empty());
    assert!(h.publisher.published().await.is_empty());
}

#[tokio::test]
async fn slot_close_failure_refunds_the_completed_payment() {
    let h = harness(PaymentScript::Complete);
    h.slots.go_dark();

    let outcome = h
        .orchestrator
        .create_booking(three_hour_request())
        .await
        .unwrap();

    let BookingOutcome::SlotUnavailable { booking_id } = outcome else {
        panic!("expected slot-unavailable outcome, got {outcome:?}");
    };

    // Compensation ran: the completed payment was refunded
    assert_eq!(h.payments.refunds().await, vec![h.payments.payment_id()]);

    let booking = h.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert!(h.publisher.published().await.is_empty());
}

#[tokio::test]
async fn publish_failure_does_not_fail_the_booking() {
    let h = harness(PaymentScript::Complete);
    h.publisher.fail_publishes();

    let outcome = h
        .orchestrator
        .create_booking(three_hour_request())
        .await
        .unwrap();

    // Fire-and-forget: the booking still completes
    let BookingOutcome::Completed { booking_id } = outcome else {
        panic!("expected completed outcome, got {outcome:?}");
    };
    let booking = h.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn open_breaker_short_circuits_payment_requests() {
    let h = harness(PaymentScript::Unavailable);

    // Default breaker window needs four recorded outcomes to trip
    for _ in 0..4 {
        let outcome = h
            .orchestrator
            .create_booking(three_hour_request())
            .await
            .unwrap();
        assert!(matches!(outcome, BookingOutcome::PaymentUnavailable { .. }));
    }
    assert_eq!(h.payments.requests().await.len(), 4);

    // Breaker is open now: the next attempt never reaches the gateway
    let outcome = h
        .orchestrator
        .create_booking(three_hour_request())
        .await
        .unwrap();
    assert!(matches!(outcome, BookingOutcome::PaymentUnavailable { .. }));
    assert_eq!(h.payments.requests().await.len(), 4);
}

#[tokio::test]
async fn negative_price_is_rejected_before_any_side_effect() {
    let h = harness(PaymentScript::Complete);
    let mut request = three_hour_request();
    request.price_per_hour = Money::parse("-1").unwrap();

    let result = h.orchestrator.create_booking(request).await;
    assert!(result.is_err());
    assert!(h.payments.requests().await.is_empty());
}
