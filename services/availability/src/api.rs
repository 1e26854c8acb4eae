//! Availability REST endpoint.
//!
//! - `GET /api/v1/available-slots?car_category=&from=&until=` - open slots
//!   whose restrictions permit the requested category and window

use crate::search::{available_slots, AvailabilityQuery};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use slotwise_core::{Money, ParkingSlot};
use slotwise_web::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters for the availability search.
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    /// Car category the customer wants to park
    pub car_category: Option<String>,
    /// Desired window start
    pub from: Option<DateTime<Utc>>,
    /// Desired window end
    pub until: Option<DateTime<Utc>>,
}

/// One available slot on the wire.
#[derive(Debug, Serialize)]
pub struct AvailableSlotResponse {
    /// Slot ID
    pub id: Uuid,
    /// Owning landlord
    pub landlord_id: Uuid,
    /// Hourly price
    pub price_per_hour: Money,
}

impl From<ParkingSlot> for AvailableSlotResponse {
    fn from(slot: ParkingSlot) -> Self {
        Self {
            id: *slot.id.as_uuid(),
            landlord_id: *slot.landlord_id.as_uuid(),
            price_per_hour: slot.price_per_hour,
        }
    }
}

/// Open slots that permit the requested category and window.
pub async fn fetch_available_slots(
    State(state): State<AppState>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<AvailableSlotResponse>>, AppError> {
    let filter = AvailabilityQuery::new(query.car_category, query.from, query.until)?;

    let open = state
        .slots
        .list_open()
        .await
        .map_err(|e| AppError::unavailable(e.to_string()))?;

    let available = available_slots(open, &filter);
    tracing::debug!(count = available.len(), "Availability search completed");
    Ok(Json(available.into_iter().map(Into::into).collect()))
}
