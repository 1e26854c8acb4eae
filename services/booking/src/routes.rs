//! Router configuration for the booking service.

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

/// Build the booking service router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/bookings", post(api::create_booking))
        .route("/bookings/:id", get(api::get_booking))
        .route("/bookings/:id", put(api::update_booking))
        .route("/bookings/:id", delete(api::delete_booking))
        .route("/users/:id/bookings", get(api::bookings_by_user));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
