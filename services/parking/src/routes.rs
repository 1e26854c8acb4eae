//! Router configuration for the parking service.

use crate::api;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Router,
};
use slotwise_web::{correlation_id_layer, handlers};

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render().unwrap_or_default()
}

/// Build the parking service router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/parking-slots", post(api::create_slot))
        .route("/parking-slots", get(api::list_slots))
        .route("/parking-slots/:id", get(api::get_slot))
        .route("/parking-slots/:id", put(api::update_slot))
        .route("/parking-slots/:id", delete(api::delete_slot))
        .route("/parking-slots/:id/status", put(api::put_status));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
