//! Location REST endpoint.
//!
//! - `GET /location?address=...` - geocode a street address

use crate::geocode::GeocodeError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use slotwise_core::GeocodedAddress;
use slotwise_web::error::AppError;
use serde::Deserialize;

/// Query parameters for address processing.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// The address to resolve
    pub address: String,
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NoMatch(ref address) => Self::not_found("Address", address),
            GeocodeError::Unavailable(_) | GeocodeError::InvalidResponse(_) => {
                Self::unavailable(err.to_string())
            }
        }
    }
}

/// Resolve an address to coordinates.
pub async fn process_address(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<GeocodedAddress>, AppError> {
    if query.address.trim().is_empty() {
        return Err(AppError::bad_request("address must not be empty"));
    }

    let resolved = state.geocoder.geocode(&query.address).await?;
    tracing::info!(address = %query.address, "Address processed");
    Ok(Json(resolved))
}
