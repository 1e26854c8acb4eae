//! Router configuration for the payment service.

use crate::api;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use slotwise_web::{correlation_id_layer, handlers};

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render().unwrap_or_default()
}

/// Build the payment service router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/make-payment", post(api::make_payment))
        .route("/payments/:id/refund", post(api::refund_payment))
        .route("/payments/:id", get(api::get_payment));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
