//! Router configuration for the user service.

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

/// Build the user service router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", post(api::create_user))
        .route("/users", get(api::list_users))
        // Static segment; takes precedence over the ":id" capture below.
        .route("/users/transfer", post(api::transfer))
        .route("/users/:id", get(api::get_user))
        .route("/users/:id", put(api::update_user))
        .route("/users/:id", delete(api::delete_user))
        .route("/users/:id/balance", get(api::get_balance))
        .route("/users/:id/balance", put(api::put_balance));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
