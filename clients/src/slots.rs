//! Client for the parking service's slot API.

use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use reqwest::StatusCode;
use slotwise_core::{ParkingSlot, SlotId, SlotStatus};

const SERVICE: &str = "parking-service";

/// Access to parking slots held by the parking service.
#[async_trait]
pub trait SlotGateway: Send + Sync {
    /// Move a slot to a new occupancy state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown slot and
    /// [`ClientError::Unavailable`] when the parking service is
    /// unreachable.
    async fn set_status(&self, slot: SlotId, status: SlotStatus) -> Result<(), ClientError>;

    /// All slots currently open for booking.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unavailable`] when the parking service is
    /// unreachable.
    async fn list_open(&self) -> Result<Vec<ParkingSlot>, ClientError>;
}

/// reqwest-backed [`SlotGateway`] against the parking service REST API.
#[derive(Clone)]
pub struct HttpSlotGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSlotGateway {
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
impl SlotGateway for HttpSlotGateway {
    async fn set_status(&self, slot: SlotId, status: SlotStatus) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/parking-slots/{slot}/status", self.base_url);
        let response = self
            .client
            .put(&url)
            .json(&status)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "ParkingSlot",
                id: slot.to_string(),
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

    async fn list_open(&self) -> Result<Vec<ParkingSlot>, ClientError> {
        let url = format!("{}/api/v1/parking-slots?status=OPEN", self.base_url);
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
                .json::<Vec<ParkingSlot>>()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: SERVICE,
                    reason: e.to_string(),
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
