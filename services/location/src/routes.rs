//! Router configuration for the location service.

use crate::api;
use crate::state::AppState;
use axum::{extract::State, routing::get, Router};
use slotwise_web::{correlation_id_layer, handlers};

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render().unwrap_or_default()
}

/// Build the location service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .route("/location", get(api::process_address))
        .layer(correlation_id_layer())
        .with_state(state)
}
