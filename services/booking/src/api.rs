//! Booking REST endpoints.
//!
//! - `POST /api/v1/bookings` - create a booking and run the payment saga
//! - `GET /api/v1/bookings/:id` - fetch one booking
//! - `PUT /api/v1/bookings/:id` - unconditional overwrite
//! - `DELETE /api/v1/bookings/:id` - unconditional removal
//! - `GET /api/v1/users/:id/bookings` - all bookings of one customer

use crate::orchestrator::{BookingOutcome, NewBooking};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use slotwise_core::{
    Booking, BookingId, BookingStatus, Money, SlotId, TimeWindow, UserId,
};
use slotwise_web::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Customer paying for the slot
    pub customer_id: Uuid,
    /// Landlord owning the slot
    pub landlord_id: Uuid,
    /// The slot to reserve
    pub parking_slot_id: Uuid,
    /// Hourly price as a decimal string
    pub price_per_hour: Money,
    /// Window start
    pub time_from: DateTime<Utc>,
    /// Window end
    pub time_until: DateTime<Utc>,
}

/// Response after a completed booking.
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    /// Created booking ID
    pub booking_id: Uuid,
    /// Outcome message
    pub message: String,
}

/// One booking record on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Booking ID
    pub id: Uuid,
    /// Customer paying for the slot
    pub customer_id: Uuid,
    /// Landlord owning the slot
    pub landlord_id: Uuid,
    /// The reserved slot
    pub parking_slot_id: Uuid,
    /// Hourly price
    pub price_per_hour: Money,
    /// Window start
    pub time_from: DateTime<Utc>,
    /// Window end
    pub time_until: DateTime<Utc>,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            customer_id: *booking.customer_id.as_uuid(),
            landlord_id: *booking.landlord_id.as_uuid(),
            parking_slot_id: *booking.parking_slot_id.as_uuid(),
            price_per_hour: booking.price_per_hour,
            time_from: booking.window.from,
            time_until: booking.window.until,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

/// Request to overwrite a booking.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    /// Customer paying for the slot
    pub customer_id: Uuid,
    /// Landlord owning the slot
    pub landlord_id: Uuid,
    /// The reserved slot
    pub parking_slot_id: Uuid,
    /// Hourly price as a decimal string
    pub price_per_hour: Money,
    /// Window start
    pub time_from: DateTime<Utc>,
    /// Window end
    pub time_until: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a booking and orchestrate payment, slot closure and event
/// publication.
///
/// Outcomes map onto distinct responses:
/// - completed -> `201` with "Booking completed."
/// - declined -> `402 PAYMENT_DECLINED` with "Payment rejected."
/// - payment service unreachable -> `503 PAYMENT_UNAVAILABLE`
/// - slot close failed (payment refunded) -> `503 SLOT_UNAVAILABLE`
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let window = TimeWindow::new(request.time_from, request.time_until)?;
    let new_booking = NewBooking {
        customer_id: UserId::from_uuid(request.customer_id),
        landlord_id: UserId::from_uuid(request.landlord_id),
        parking_slot_id: SlotId::from_uuid(request.parking_slot_id),
        price_per_hour: request.price_per_hour,
        window,
    };

    match state.orchestrator.create_booking(new_booking).await? {
        BookingOutcome::Completed { booking_id } => Ok((
            StatusCode::CREATED,
            Json(CreateBookingResponse {
                booking_id: *booking_id.as_uuid(),
                message: "Booking completed.".to_string(),
            }),
        )),
        BookingOutcome::PaymentRejected { .. } => {
            Err(AppError::payment_required("Payment rejected."))
        }
        BookingOutcome::PaymentUnavailable { .. } => Err(AppError::unavailable_with_code(
            "Payment service unavailable, booking cancelled",
            "PAYMENT_UNAVAILABLE",
        )),
        BookingOutcome::SlotUnavailable { .. } => Err(AppError::unavailable_with_code(
            "Parking service unavailable, payment refunded and booking cancelled",
            "SLOT_UNAVAILABLE",
        )),
    }
}

/// Fetch one booking by id.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking_id = BookingId::from_uuid(id);
    let booking = state
        .bookings
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    Ok(Json(booking.into()))
}

/// Unconditional overwrite by id.
///
/// No ownership or state check: a confirmed booking can be rewritten,
/// matching the store's original update semantics.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<StatusCode, AppError> {
    let booking_id = BookingId::from_uuid(id);
    let window = TimeWindow::new(request.time_from, request.time_until)?;

    // Preserve lifecycle fields when the row exists; an unknown id is
    // created fresh, like a repository save().
    let existing = state.bookings.find_by_id(booking_id).await?;
    let (status, created_at) = existing
        .map_or((BookingStatus::Pending, state.clock.now()), |b| {
            (b.status, b.created_at)
        });

    let booking = Booking {
        id: booking_id,
        customer_id: UserId::from_uuid(request.customer_id),
        landlord_id: UserId::from_uuid(request.landlord_id),
        parking_slot_id: SlotId::from_uuid(request.parking_slot_id),
        price_per_hour: request.price_per_hour,
        window,
        status,
        created_at,
    };
    state.bookings.update(&booking).await?;
    tracing::info!(booking_id = %booking_id, "Booking updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Unconditional removal by id.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let booking_id = BookingId::from_uuid(id);
    state.bookings.delete(booking_id).await?;
    tracing::info!(booking_id = %booking_id, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// All bookings made by one customer. Order is unspecified.
pub async fn bookings_by_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state
        .bookings
        .list_by_customer(UserId::from_uuid(id))
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
