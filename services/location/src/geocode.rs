//! Address geocoding.
//!
//! Abstraction over geocoding providers. The production implementation
//! talks to a Nominatim-compatible HTTP endpoint configured per
//! deployment; no vendor SDK and no baked-in API key.

use async_trait::async_trait;
use serde::Deserialize;
use slotwise_core::{GeoPoint, GeocodedAddress};
use std::time::Duration;
use thiserror::Error;

/// Errors from geocoding.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The provider knows no such address.
    #[error("address could not be resolved: {0}")]
    NoMatch(String),

    /// The provider is unreachable or answered with an error.
    #[error("geocoding provider unavailable: {0}")]
    Unavailable(String),

    /// The provider's response could not be decoded.
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),
}

/// Resolves street addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve one address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NoMatch`] when the provider has no result
    /// and [`GeocodeError::Unavailable`] when it cannot be reached.
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
}

/// One result row in a Nominatim-style response.
#[derive(Debug, Deserialize)]
struct NominatimRow {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoder against a Nominatim-compatible search endpoint.
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    /// Build a geocoder for the given endpoint base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let rows: Vec<NominatimRow> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

        let latitude: f64 = row
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude: {}", row.lat)))?;
        let longitude: f64 = row
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude: {}", row.lon)))?;

        Ok(GeocodedAddress {
            point: GeoPoint {
                latitude,
                longitude,
            },
            formatted: row.display_name,
        })
    }
}
