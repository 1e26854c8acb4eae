//! HTTP API tests for the availability service with a scripted slot
//! gateway.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use availability_service::{build_router, AppState};
use chrono::{TimeZone, Utc};
use slotwise_core::{
    CarCategory, Money, ParkingRestriction, ParkingSlot, RestrictionId, SlotId, SlotStatus,
    TimeWindow, UserId,
};
use slotwise_runtime::MetricsServer;
use slotwise_testing::RecordingSlotGateway;
use std::sync::Arc;

async fn serve(gateway: Arc<RecordingSlotGateway>) -> String {
    let state = AppState {
        slots: gateway,
        metrics: Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap())),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn truck_restricted_slot() -> ParkingSlot {
    ParkingSlot {
        id: SlotId::new(),
        landlord_id: UserId::new(),
        status: SlotStatus::Open,
        price_per_hour: Money::parse("2").unwrap(),
        restrictions: vec![ParkingRestriction {
            id: RestrictionId::new(),
            window: TimeWindow::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap(),
            )
            .unwrap(),
            car_category: CarCategory::new("TRUCK").unwrap(),
            code: "NO-HGV".to_string(),
        }],
    }
}

#[tokio::test]
async fn open_slots_are_returned_and_restrictions_filter_by_category() {
    let gateway = Arc::new(RecordingSlotGateway::new());
    gateway.set_open_slots(vec![truck_restricted_slot()]).await;
    let base = serve(gateway).await;
    let client = reqwest::Client::new();

    // A sedan can park during the truck restriction
    let sedans: serde_json::Value = client
        .get(format!(
            "{base}/api/v1/available-slots?car_category=SEDAN&from=2025-03-01T10:00:00Z&until=2025-03-01T12:00:00Z"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sedans.as_array().unwrap().len(), 1);

    // A truck cannot
    let trucks: serde_json::Value = client
        .get(format!(
            "{base}/api/v1/available-slots?car_category=TRUCK&from=2025-03-01T10:00:00Z&until=2025-03-01T12:00:00Z"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(trucks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_parking_service_is_a_503() {
    let gateway = Arc::new(RecordingSlotGateway::new());
    gateway.go_dark();
    let base = serve(gateway).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/api/v1/available-slots"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn half_open_window_is_a_400() {
    let gateway = Arc::new(RecordingSlotGateway::new());
    let base = serve(gateway).await;

    let response = reqwest::Client::new()
        .get(format!(
            "{base}/api/v1/available-slots?from=2025-03-01T10:00:00Z"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
