//! HTTP API tests for the user service against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use slotwise_runtime::MetricsServer;
use slotwise_testing::InMemoryUserRepository;
use std::sync::Arc;
use user_service::{build_router, AppState};
use uuid::Uuid;

async fn serve() -> String {
    let state = AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        metrics: Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap())),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn user_body(email: &str, balance: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": "hunter2",
        "first_name": "Mari",
        "last_name": "Tamm",
        "role": "CUSTOMER",
        "balance": balance,
    })
}

async fn create_user(client: &reqwest::Client, base: &str, body: &serde_json::Value) -> String {
    let response = client
        .post(format!("{base}/api/v1/users"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    body["user_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn created_user_is_fetchable_and_hides_the_password() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let id = create_user(&client, &base, &user_body("mari@example.com", "50")).await;

    let fetched: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["email"], "mari@example.com");
    assert_eq!(fetched["balance"], "50");
    assert!(fetched.get("password").is_none());
    assert!(fetched.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_409() {
    let base = serve().await;
    let client = reqwest::Client::new();

    create_user(&client, &base, &user_body("mari@example.com", "0")).await;

    let response = client
        .post(format!("{base}/api/v1/users"))
        .json(&user_body("mari@example.com", "0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn unknown_user_is_a_404() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/v1/users/{}", Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn balance_can_be_read_and_overwritten() {
    let base = serve().await;
    let client = reqwest::Client::new();
    let id = create_user(&client, &base, &user_body("mari@example.com", "50")).await;

    let balance: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{id}/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balance, json!("50"));

    let put = client
        .put(format!("{base}/api/v1/users/{id}/balance"))
        .json(&json!("75.50"))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), 204);

    let balance: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{id}/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balance, json!("75.50"));
}

#[tokio::test]
async fn transfer_moves_both_balances_or_neither() {
    let base = serve().await;
    let client = reqwest::Client::new();
    let payer = create_user(&client, &base, &user_body("payer@example.com", "50")).await;
    let receiver = create_user(&client, &base, &user_body("landlord@example.com", "0")).await;

    // Covered transfer completes and moves both balances
    let response: serde_json::Value = client
        .post(format!("{base}/api/v1/users/transfer"))
        .json(&json!({"payer_id": payer, "receiver_id": receiver, "amount": "30"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["status"], "COMPLETED");

    let payer_balance: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{payer}/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(payer_balance, json!("20"));

    // Uncovered transfer is declined and both balances stay put
    let response: serde_json::Value = client
        .post(format!("{base}/api/v1/users/transfer"))
        .json(&json!({"payer_id": payer, "receiver_id": receiver, "amount": "100"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["status"], "INSUFFICIENT_FUNDS");

    let receiver_balance: serde_json::Value = client
        .get(format!("{base}/api/v1/users/{receiver}/balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(receiver_balance, json!("30"));
}

#[tokio::test]
async fn listing_is_paginated_and_ordered_by_email() {
    let base = serve().await;
    let client = reqwest::Client::new();
    for email in ["c@example.com", "a@example.com", "b@example.com"] {
        create_user(&client, &base, &user_body(email, "0")).await;
    }

    let page: serde_json::Value = client
        .get(format!("{base}/api/v1/users?page=0&page_size=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 3);
    let emails: Vec<&str> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);

    let page: serde_json::Value = client
        .get(format!("{base}/api/v1/users?page=1&page_size=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
}
