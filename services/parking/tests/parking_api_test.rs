//! HTTP API tests for the parking service against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use parking_service::{build_router, AppState};
use serde_json::json;
use slotwise_runtime::MetricsServer;
use slotwise_testing::InMemoryParkingSlotRepository;
use std::sync::Arc;
use uuid::Uuid;

async fn serve() -> String {
    let state = AppState {
        slots: Arc::new(InMemoryParkingSlotRepository::new()),
        metrics: Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap())),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn slot_body(landlord: Uuid) -> serde_json::Value {
    json!({
        "landlord_id": landlord,
        "price_per_hour": "2.50",
        "restrictions": [{
            "time_from": "2025-03-01T00:00:00Z",
            "time_until": "2025-03-31T23:59:59Z",
            "car_category": "TRUCK",
            "code": "NO-HGV",
        }],
    })
}

async fn create_slot(client: &reqwest::Client, base: &str, body: &serde_json::Value) -> String {
    let response = client
        .post(format!("{base}/api/v1/parking-slots"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    body["slot_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn created_slot_defaults_to_open_and_keeps_its_restrictions() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let id = create_slot(&client, &base, &slot_body(Uuid::new_v4())).await;

    let slot: serde_json::Value = client
        .get(format!("{base}/api/v1/parking-slots/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(slot["status"], "OPEN");
    assert_eq!(slot["price_per_hour"], "2.50");
    assert_eq!(slot["restrictions"][0]["car_category"], "TRUCK");
    assert_eq!(slot["restrictions"][0]["code"], "NO-HGV");
}

#[tokio::test]
async fn status_update_has_no_response_body_and_sticks() {
    let base = serve().await;
    let client = reqwest::Client::new();
    let id = create_slot(&client, &base, &slot_body(Uuid::new_v4())).await;

    let response = client
        .put(format!("{base}/api/v1/parking-slots/{id}/status"))
        .json(&json!("CLOSED"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
    assert!(response.bytes().await.unwrap().is_empty());

    let slot: serde_json::Value = client
        .get(format!("{base}/api/v1/parking-slots/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(slot["status"], "CLOSED");
}

#[tokio::test]
async fn status_update_for_unknown_slot_is_a_404() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!(
            "{base}/api/v1/parking-slots/{}/status",
            Uuid::new_v4()
        ))
        .json(&json!("CLOSED"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn listing_filters_by_status_and_landlord() {
    let base = serve().await;
    let client = reqwest::Client::new();
    let landlord = Uuid::new_v4();

    let first = create_slot(&client, &base, &slot_body(landlord)).await;
    create_slot(&client, &base, &slot_body(Uuid::new_v4())).await;

    client
        .put(format!("{base}/api/v1/parking-slots/{first}/status"))
        .json(&json!("CLOSED"))
        .send()
        .await
        .unwrap();

    let open: serde_json::Value = client
        .get(format!("{base}/api/v1/parking-slots?status=OPEN"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(open.as_array().unwrap().len(), 1);

    let of_landlord: serde_json::Value = client
        .get(format!("{base}/api/v1/parking-slots?landlord_id={landlord}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(of_landlord.as_array().unwrap().len(), 1);
    assert_eq!(of_landlord[0]["id"].as_str().unwrap(), first);
}

#[tokio::test]
async fn invalid_restriction_window_is_a_400() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let mut body = slot_body(Uuid::new_v4());
    body["restrictions"][0]["time_from"] = json!("2025-03-31T00:00:00Z");
    body["restrictions"][0]["time_until"] = json!("2025-03-01T00:00:00Z");

    let response = client
        .post(format!("{base}/api/v1/parking-slots"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
