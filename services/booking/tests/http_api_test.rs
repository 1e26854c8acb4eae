//! HTTP API integration tests.
//!
//! Serves the real router on an ephemeral port, backed by in-memory stores
//! and scripted downstream gateways, and exercises the REST contract with a
//! real HTTP client.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Integration tests can use unwrap/expect for setup

use booking_service::config::DownstreamConfig;
use booking_service::{build_router, AppState, BookingOrchestrator};
use chrono::{TimeZone, Utc};
use serde_json::json;
use slotwise_runtime::circuit_breaker::CircuitBreakerRegistry;
use slotwise_runtime::MetricsServer;
use slotwise_testing::{
    test_clock, InMemoryBookingRepository, InMemoryEventPublisher, PaymentScript,
    RecordingSlotGateway, ScriptedPaymentGateway,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

async fn serve(script: PaymentScript) -> String {
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let orchestrator = BookingOrchestrator::new(
        bookings.clone(),
        Arc::new(ScriptedPaymentGateway::new(script)),
        Arc::new(RecordingSlotGateway::new()),
        Arc::new(InMemoryEventPublisher::new()),
        Arc::new(test_clock()),
        &CircuitBreakerRegistry::new(),
        &DownstreamConfig {
            payment_base_url: "http://localhost:8087".to_string(),
            parking_base_url: "http://localhost:8084".to_string(),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            payment_breaker_cooldown: Duration::from_secs(10),
        },
        "booking-events",
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        bookings,
        clock: Arc::new(test_clock()),
        metrics: Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap())),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn booking_body() -> serde_json::Value {
    let from = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let until = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    json!({
        "customer_id": Uuid::new_v4(),
        "landlord_id": Uuid::new_v4(),
        "parking_slot_id": Uuid::new_v4(),
        "price_per_hour": "10",
        "time_from": from,
        "time_until": until,
    })
}

#[tokio::test]
async fn create_booking_returns_201_and_the_booking_is_fetchable() {
    let base = serve(PaymentScript::Complete).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/v1/bookings"))
        .json(&booking_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Booking completed.");
    let booking_id = body["booking_id"].as_str().unwrap().to_string();

    let fetched = client
        .get(format!("{base}/api/v1/bookings/{booking_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), 200);
    let fetched: serde_json::Value = fetched.json().await.unwrap();
    assert_eq!(fetched["status"], "CONFIRMED");
    assert_eq!(fetched["price_per_hour"], "10");
}

#[tokio::test]
async fn declined_payment_maps_to_402_with_the_rejection_message() {
    let base = serve(PaymentScript::Decline).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/v1/bookings"))
        .json(&booking_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 402);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "PAYMENT_DECLINED");
    assert_eq!(body["message"], "Payment rejected.");
}

#[tokio::test]
async fn unreachable_payment_service_maps_to_503_with_its_own_code() {
    let base = serve(PaymentScript::Unavailable).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/v1/bookings"))
        .json(&booking_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "PAYMENT_UNAVAILABLE");
}

#[tokio::test]
async fn inverted_time_window_is_a_400() {
    let base = serve(PaymentScript::Complete).await;
    let client = reqwest::Client::new();

    let mut body = booking_body();
    body["time_from"] = json!(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    body["time_until"] = json!(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());

    let response = client
        .post(format!("{base}/api/v1/bookings"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_booking_is_a_404() {
    let base = serve(PaymentScript::Complete).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/v1/bookings/{}", Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn bookings_by_user_lists_only_that_customer() {
    let base = serve(PaymentScript::Complete).await;
    let client = reqwest::Client::new();

    let customer = Uuid::new_v4();
    let mut body = booking_body();
    body["customer_id"] = json!(customer);
    client
        .post(format!("{base}/api/v1/bookings"))
        .json(&body)
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/api/v1/bookings"))
        .json(&booking_body())
        .send()
        .await
        .unwrap();

    let listed: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{customer}/bookings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["customer_id"], json!(customer));
}
