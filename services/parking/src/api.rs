//! Parking slot REST endpoints.
//!
//! - `POST /api/v1/parking-slots` - create a slot with its restrictions
//! - `GET /api/v1/parking-slots` - filtered listing (`status`, `landlord_id`)
//! - `GET/PUT/DELETE /api/v1/parking-slots/:id` - fetch / overwrite / remove
//! - `PUT /api/v1/parking-slots/:id/status` - status update, no response
//!   body (the wire contract the booking orchestrator relies on)

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use slotwise_core::repository::SlotFilter;
use slotwise_core::{
    CarCategory, Money, ParkingRestriction, ParkingSlot, RestrictionId, SlotId, SlotStatus,
    TimeWindow, UserId,
};
use slotwise_web::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One restriction in a slot request.
#[derive(Debug, Deserialize)]
pub struct RestrictionRequest {
    /// Restriction window start
    pub time_from: DateTime<Utc>,
    /// Restriction window end
    pub time_until: DateTime<Utc>,
    /// Restricted car category label
    pub car_category: String,
    /// Municipal or landlord-defined code
    pub code: String,
}

/// Request to create or overwrite a slot.
#[derive(Debug, Deserialize)]
pub struct SlotRequest {
    /// Owning landlord
    pub landlord_id: Uuid,
    /// Occupancy state; new slots default to OPEN
    #[serde(default)]
    pub status: Option<SlotStatus>,
    /// Hourly price as a decimal string
    pub price_per_hour: Money,
    /// Restrictions attached to the slot
    #[serde(default)]
    pub restrictions: Vec<RestrictionRequest>,
}

/// Response after creating a slot.
#[derive(Debug, Serialize)]
pub struct CreateSlotResponse {
    /// Created slot ID
    pub slot_id: Uuid,
}

/// One restriction on the wire.
#[derive(Debug, Serialize)]
pub struct RestrictionResponse {
    /// Restriction ID
    pub id: Uuid,
    /// Restriction window start
    pub time_from: DateTime<Utc>,
    /// Restriction window end
    pub time_until: DateTime<Utc>,
    /// Restricted car category label
    pub car_category: String,
    /// Restriction code
    pub code: String,
}

/// One slot on the wire.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    /// Slot ID
    pub id: Uuid,
    /// Owning landlord
    pub landlord_id: Uuid,
    /// Occupancy state
    pub status: SlotStatus,
    /// Hourly price
    pub price_per_hour: Money,
    /// Restrictions attached to the slot
    pub restrictions: Vec<RestrictionResponse>,
}

impl From<ParkingSlot> for SlotResponse {
    fn from(slot: ParkingSlot) -> Self {
        Self {
            id: *slot.id.as_uuid(),
            landlord_id: *slot.landlord_id.as_uuid(),
            status: slot.status,
            price_per_hour: slot.price_per_hour,
            restrictions: slot
                .restrictions
                .into_iter()
                .map(|r| RestrictionResponse {
                    id: *r.id.as_uuid(),
                    time_from: r.window.from,
                    time_until: r.window.until,
                    car_category: r.car_category.as_str().to_string(),
                    code: r.code,
                })
                .collect(),
        }
    }
}

/// Query parameters for listing slots.
#[derive(Debug, Deserialize)]
pub struct ListSlotsQuery {
    /// Restrict to one occupancy state
    pub status: Option<SlotStatus>,
    /// Restrict to one landlord
    pub landlord_id: Option<Uuid>,
}

fn build_slot(id: SlotId, request: SlotRequest) -> Result<ParkingSlot, AppError> {
    let restrictions = request
        .restrictions
        .into_iter()
        .map(|r| {
            Ok(ParkingRestriction {
                id: RestrictionId::new(),
                window: TimeWindow::new(r.time_from, r.time_until)?,
                car_category: CarCategory::new(r.car_category)?,
                code: r.code,
            })
        })
        .collect::<Result<Vec<_>, slotwise_core::DomainError>>()?;

    Ok(ParkingSlot {
        id,
        landlord_id: UserId::from_uuid(request.landlord_id),
        status: request.status.unwrap_or(SlotStatus::Open),
        price_per_hour: request.price_per_hour,
        restrictions,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a slot.
pub async fn create_slot(
    State(state): State<AppState>,
    Json(request): Json<SlotRequest>,
) -> Result<(StatusCode, Json<CreateSlotResponse>), AppError> {
    let slot = build_slot(SlotId::new(), request)?;
    state.slots.insert(&slot).await?;
    tracing::info!(slot_id = %slot.id, "Parking slot created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSlotResponse {
            slot_id: *slot.id.as_uuid(),
        }),
    ))
}

/// Fetch one slot by id.
pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SlotResponse>, AppError> {
    let slot_id = SlotId::from_uuid(id);
    let slot = state
        .slots
        .find_by_id(slot_id)
        .await?
        .ok_or_else(|| AppError::not_found("ParkingSlot", slot_id))?;
    Ok(Json(slot.into()))
}

/// Slots matching the filter.
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let filter = SlotFilter {
        status: query.status,
        landlord_id: query.landlord_id.map(UserId::from_uuid),
    };
    let slots = state.slots.list(filter).await?;
    Ok(Json(slots.into_iter().map(Into::into).collect()))
}

/// Unconditional overwrite by id.
pub async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SlotRequest>,
) -> Result<StatusCode, AppError> {
    let slot = build_slot(SlotId::from_uuid(id), request)?;
    state.slots.update(&slot).await?;
    tracing::info!(slot_id = %slot.id, "Parking slot updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Unconditional removal by id.
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let slot_id = SlotId::from_uuid(id);
    state.slots.delete(slot_id).await?;
    tracing::info!(slot_id = %slot_id, "Parking slot deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Status update. Body is the bare status value; no response body.
pub async fn put_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<SlotStatus>,
) -> Result<StatusCode, AppError> {
    let slot_id = SlotId::from_uuid(id);
    state.slots.set_status(slot_id, status).await?;
    tracing::info!(slot_id = %slot_id, status = ?status, "Slot status updated");
    Ok(StatusCode::NO_CONTENT)
}
