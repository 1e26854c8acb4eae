//! Payment decision tests against in-memory doubles.
//!
//! Exercises the charge computation (truncated whole hours), the atomic
//! transfer, the ledger-row-per-decision rule, refunds, and the behavior
//! when no decision can be reached.

#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use payment_service::config::DownstreamConfig;
use payment_service::{PaymentError, PaymentProcessor};
use slotwise_clients::UserLedger;
use slotwise_core::{
    Booking, BookingId, BookingStatus, Money, PaymentStatus, SlotId, TimeWindow, UserId,
};
use slotwise_runtime::circuit_breaker::CircuitBreakerRegistry;
use slotwise_testing::{
    test_clock, InMemoryPaymentRepository, InMemoryUserLedger, StaticBookings,
};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    processor: PaymentProcessor,
    ledger: Arc<InMemoryPaymentRepository>,
    bookings: Arc<StaticBookings>,
    users: Arc<InMemoryUserLedger>,
}

fn harness() -> Harness {
    let ledger = Arc::new(InMemoryPaymentRepository::new());
    let bookings = Arc::new(StaticBookings::new());
    let users = Arc::new(InMemoryUserLedger::new());

    let processor = PaymentProcessor::new(
        ledger.clone(),
        bookings.clone(),
        users.clone(),
        Arc::new(test_clock()),
        &CircuitBreakerRegistry::new(),
        &DownstreamConfig {
            booking_base_url: "http://localhost:8086".to_string(),
            user_base_url: "http://localhost:8083".to_string(),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            ledger_breaker_cooldown: Duration::from_secs(30),
        },
    );

    Harness {
        processor,
        ledger,
        bookings,
        users,
    }
}

fn booking(price: &str, minutes: i64) -> Booking {
    let from = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    Booking {
        id: BookingId::new(),
        customer_id: UserId::new(),
        landlord_id: UserId::new(),
        parking_slot_id: SlotId::new(),
        price_per_hour: Money::parse(price).unwrap(),
        window: TimeWindow::new(from, from + chrono::Duration::minutes(minutes)).unwrap(),
        status: BookingStatus::Pending,
        created_at: from,
    }
}

#[tokio::test]
async fn sufficient_balance_completes_and_moves_both_balances() {
    let h = harness();
    // Booking: price "10", window spanning exactly 3 hours, payer balance "50"
    let booking = booking("10", 180);
    h.users
        .seed(booking.customer_id, Money::parse("50").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("100").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();

    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, Money::parse("30").unwrap());
    assert_eq!(payment.payer_id, booking.customer_id);
    assert_eq!(payment.receiver_id, booking.landlord_id);

    // Payer debited, landlord credited by the same amount
    assert_eq!(
        h.users.balance_of(booking.customer_id).await.unwrap(),
        Money::parse("20").unwrap()
    );
    assert_eq!(
        h.users.balance_of(booking.landlord_id).await.unwrap(),
        Money::parse("130").unwrap()
    );

    // Exactly one ledger row
    assert_eq!(h.ledger.all().await.len(), 1);
}

#[tokio::test]
async fn insufficient_balance_declines_and_still_records_the_charge() {
    let h = harness();
    // Same booking, payer balance "5"
    let booking = booking("10", 180);
    h.users
        .seed(booking.customer_id, Money::parse("5").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("0").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();

    assert_eq!(payment.status, PaymentStatus::Declined);
    // The declined row still carries the computed charge
    assert_eq!(payment.amount, Money::parse("30").unwrap());

    // Neither balance moved
    assert_eq!(
        h.users.balance_of(booking.customer_id).await.unwrap(),
        Money::parse("5").unwrap()
    );
    assert_eq!(
        h.users.balance_of(booking.landlord_id).await.unwrap(),
        Money::parse("0").unwrap()
    );

    let rows = h.ledger.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, PaymentStatus::Declined);
}

#[tokio::test]
async fn partial_hours_are_truncated_not_rounded_up() {
    let h = harness();
    // 2 h 59 m is charged as 2 whole hours
    let booking = booking("10", 179);
    h.users
        .seed(booking.customer_id, Money::parse("50").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("0").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();

    assert_eq!(payment.amount, Money::parse("20").unwrap());
    assert_eq!(
        h.users.balance_of(booking.customer_id).await.unwrap(),
        Money::parse("30").unwrap()
    );
}

#[tokio::test]
async fn decimal_prices_multiply_exactly() {
    let h = harness();
    let booking = booking("2.50", 120);
    h.users
        .seed(booking.customer_id, Money::parse("10").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("0").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();

    assert_eq!(payment.amount, Money::parse("5.00").unwrap());
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn unknown_booking_fails_without_a_ledger_row() {
    let h = harness();

    let result = h.processor.make_payment(BookingId::new()).await;

    assert!(matches!(result, Err(PaymentError::BookingNotFound(_))));
    assert!(h.ledger.all().await.is_empty());
}

#[tokio::test]
async fn unreachable_user_store_reaches_no_decision() {
    let h = harness();
    let booking = booking("10", 180);
    h.bookings.insert(booking.clone()).await;
    h.users.go_dark();

    let result = h.processor.make_payment(booking.id).await;

    // The outage stays visible; it is not collapsed into DECLINED
    assert!(matches!(result, Err(PaymentError::Unavailable { .. })));
    // No decision, no ledger row
    assert!(h.ledger.all().await.is_empty());
}

#[tokio::test]
async fn refund_reverses_the_transfer_and_appends_a_row() {
    let h = harness();
    let booking = booking("10", 180);
    h.users
        .seed(booking.customer_id, Money::parse("50").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("0").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();
    let refund = h.processor.refund(payment.id).await.unwrap();

    assert_eq!(refund.status, PaymentStatus::Refunded);
    assert_eq!(refund.amount, payment.amount);
    // Direction reversed
    assert_eq!(refund.payer_id, booking.landlord_id);
    assert_eq!(refund.receiver_id, booking.customer_id);

    // Balances restored
    assert_eq!(
        h.users.balance_of(booking.customer_id).await.unwrap(),
        Money::parse("50").unwrap()
    );
    assert_eq!(
        h.users.balance_of(booking.landlord_id).await.unwrap(),
        Money::parse("0").unwrap()
    );

    // Append-only: original row untouched, refund is a second row
    let rows = h.ledger.all().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, PaymentStatus::Completed);
    assert_eq!(rows[1].status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn declined_payments_cannot_be_refunded() {
    let h = harness();
    let booking = booking("10", 180);
    h.users
        .seed(booking.customer_id, Money::parse("5").unwrap())
        .await;
    h.users
        .seed(booking.landlord_id, Money::parse("0").unwrap())
        .await;
    h.bookings.insert(booking.clone()).await;

    let payment = h.processor.make_payment(booking.id).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Declined);

    let result = h.processor.refund(payment.id).await;
    assert!(matches!(result, Err(PaymentError::NotRefundable(_))));
    assert_eq!(h.ledger.all().await.len(), 1);
}
