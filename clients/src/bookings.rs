//! Client for the booking service's read API.

use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use reqwest::StatusCode;
use slotwise_core::{Booking, BookingId};

const SERVICE: &str = "booking-service";

/// Read access to booking records, as the payment service sees them.
#[async_trait]
pub trait BookingDirectory: Send + Sync {
    /// Fetch one booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no booking matches and
    /// [`ClientError::Unavailable`] when the booking service is
    /// unreachable.
    async fn booking(&self, id: BookingId) -> Result<Booking, ClientError>;
}

/// reqwest-backed [`BookingDirectory`] against `GET /api/v1/bookings/{id}`.
#[derive(Clone)]
pub struct HttpBookingDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingDirectory {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: config.build_client()?,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl BookingDirectory for HttpBookingDirectory {
    async fn booking(&self, id: BookingId) -> Result<Booking, ClientError> {
        let url = format!("{}/api/v1/bookings/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK => response
                .json::<Booking>()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: SERVICE,
                    reason: e.to_string(),
                }),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "Booking",
                id: id.to_string(),
            }),
            status if status.is_server_error() => Err(ClientError::Unavailable {
                service: SERVICE,
                reason: format!("status {status}"),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus {
                    service: SERVICE,
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
