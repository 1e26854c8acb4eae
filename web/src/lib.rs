//! Axum plumbing shared by the Slotwise services.
//!
//! Each service builds its own router; this crate carries the pieces they
//! all need:
//!
//! - [`AppError`]: domain-aware error type implementing `IntoResponse`
//! - [`handlers::health`]: liveness and readiness endpoints
//! - [`middleware::correlation_id_layer`]: per-request correlation IDs
//!   propagated across the booking -> payment -> user-store call chain
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, path, query)
//! 3. **Call the service layer** (orchestrator, processor, store)
//! 4. **Map domain errors** onto HTTP via `AppError`
//! 5. **Return response** to the client
//!
//! # Example
//!
//! ```ignore
//! use slotwise_web::{error::AppError, handlers::health_check};
//! use axum::{Router, routing::{get, post}, Json};
//!
//! async fn create_booking(
//!     State(state): State<AppState>,
//!     Json(request): Json<CreateBookingRequest>,
//! ) -> Result<Json<BookingResponse>, AppError> {
//!     let outcome = state.orchestrator.create_booking(request.try_into()?).await?;
//!     Ok(Json(outcome.into()))
//! }
//!
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .route("/api/v1/bookings", post(create_booking))
//!     .with_state(app_state);
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
