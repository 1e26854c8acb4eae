//! Router configuration for the availability service.

use crate::api;
use crate::state::AppState;
use axum::{extract::State, routing::get, Router};
use slotwise_web::{correlation_id_layer, handlers};

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render().unwrap_or_default()
}

/// Build the availability service router.
pub fn build_router(state: AppState) -> Router {
    let api_routes =
        Router::new().route("/available-slots", get(api::fetch_available_slots));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
