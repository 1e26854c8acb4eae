//! Client for the payment service.

use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use slotwise_core::{BookingId, PaymentId, PaymentStatus};

const SERVICE: &str = "payment-service";

/// Wire shape of `POST /api/v1/make-payment`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MakePaymentRequest {
    /// Booking to settle
    pub booking_id: BookingId,
}

/// Wire shape of the make-payment response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MakePaymentResponse {
    /// Ledger row recorded for the decision
    pub payment_id: PaymentId,
    /// Decision outcome
    pub status: PaymentStatus,
}

/// Decision reached by the payment service for one booking.
///
/// A third case - the payment service being unreachable - is deliberately
/// NOT part of this type: it surfaces as [`ClientError::Unavailable`] so
/// the orchestrator can tell a policy decline from an outage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentDecision {
    /// Payer balance covered the charge; funds moved
    Completed {
        /// Ledger row for the completed payment (needed for refunds)
        payment_id: PaymentId,
    },
    /// Insufficient balance; no funds moved
    Declined,
}

/// Payment operations invoked by the booking orchestrator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the payment service to settle one booking.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown booking and
    /// [`ClientError::Unavailable`] when the payment service is
    /// unreachable.
    async fn request_payment(&self, booking: BookingId) -> Result<PaymentDecision, ClientError>;

    /// Refund an earlier completed payment (saga compensation).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown payment and
    /// [`ClientError::Unavailable`] when the payment service is
    /// unreachable.
    async fn refund(&self, payment: PaymentId) -> Result<(), ClientError>;
}

/// reqwest-backed [`PaymentGateway`] against the payment service REST API.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
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
impl PaymentGateway for HttpPaymentGateway {
    async fn request_payment(&self, booking: BookingId) -> Result<PaymentDecision, ClientError> {
        let url = format!("{}/api/v1/make-payment", self.base_url);
        let request = MakePaymentRequest {
            booking_id: booking,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response.json::<MakePaymentResponse>().await.map_err(|e| {
                    ClientError::InvalidResponse {
                        service: SERVICE,
                        reason: e.to_string(),
                    }
                })?;
                match body.status {
                    PaymentStatus::Completed => Ok(PaymentDecision::Completed {
                        payment_id: body.payment_id,
                    }),
                    PaymentStatus::Declined => Ok(PaymentDecision::Declined),
                    PaymentStatus::Refunded => Err(ClientError::InvalidResponse {
                        service: SERVICE,
                        reason: "make-payment answered with REFUNDED".to_string(),
                    }),
                }
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "Booking",
                id: booking.to_string(),
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

    async fn refund(&self, payment: PaymentId) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/payments/{payment}/refund", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "Payment",
                id: payment.to_string(),
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
