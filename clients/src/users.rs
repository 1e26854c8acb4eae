//! Client for the user service's balance and transfer API.

use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use slotwise_core::{Money, TransferOutcome, UserId};

const SERVICE: &str = "user-service";

/// Wire shape of `POST /api/v1/users/transfer`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Debited party
    pub payer_id: UserId,
    /// Credited party
    pub receiver_id: UserId,
    /// Amount to move
    pub amount: Money,
}

/// Wire shape of the transfer response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    /// Outcome of the conditional transfer
    pub status: TransferOutcome,
}

/// Access to user balances held by the user service.
///
/// The two-party balance update is a single `transfer` call executed
/// atomically on the user store, not a pair of read-then-write balance
/// calls.
#[async_trait]
pub trait UserLedger: Send + Sync {
    /// Current balance of a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown user and
    /// [`ClientError::Unavailable`] when the user service is unreachable.
    async fn balance_of(&self, user: UserId) -> Result<Money, ClientError>;

    /// Administrative balance overwrite.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`UserLedger::balance_of`].
    async fn set_balance(&self, user: UserId, balance: Money) -> Result<(), ClientError>;

    /// Atomic conditional transfer between two users.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unavailable`] when the user service is
    /// unreachable; an insufficient balance is a normal
    /// [`TransferOutcome::InsufficientFunds`], not an error.
    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome, ClientError>;
}

/// reqwest-backed [`UserLedger`] against the user service REST API.
#[derive(Clone)]
pub struct HttpUserLedger {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserLedger {
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

    fn unavailable(e: &reqwest::Error) -> ClientError {
        ClientError::Unavailable {
            service: SERVICE,
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl UserLedger for HttpUserLedger {
    async fn balance_of(&self, user: UserId) -> Result<Money, ClientError> {
        let url = format!("{}/api/v1/users/{user}/balance", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::unavailable(&e))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Money>()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    service: SERVICE,
                    reason: e.to_string(),
                }),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "User",
                id: user.to_string(),
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

    async fn set_balance(&self, user: UserId, balance: Money) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/users/{user}/balance", self.base_url);
        let response = self
            .client
            .put(&url)
            .json(&balance)
            .send()
            .await
            .map_err(|e| Self::unavailable(&e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "User",
                id: user.to_string(),
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

    async fn transfer(
        &self,
        payer: UserId,
        receiver: UserId,
        amount: Money,
    ) -> Result<TransferOutcome, ClientError> {
        let url = format!("{}/api/v1/users/transfer", self.base_url);
        let request = TransferRequest {
            payer_id: payer,
            receiver_id: receiver,
            amount,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::unavailable(&e))?;

        match response.status() {
            StatusCode::OK => response
                .json::<TransferResponse>()
                .await
                .map(|r| r.status)
                .map_err(|e| ClientError::InvalidResponse {
                    service: SERVICE,
                    reason: e.to_string(),
                }),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: "User",
                id: payer.to_string(),
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transfer_request_wire_shape() {
        let request = TransferRequest {
            payer_id: UserId::new(),
            receiver_id: UserId::new(),
            amount: Money::parse("30").unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("payer_id").is_some());
        assert!(json.get("receiver_id").is_some());
        assert_eq!(json["amount"], "30");
    }

    #[test]
    fn transfer_response_decodes_outcomes() {
        let completed: TransferResponse =
            serde_json::from_str(r#"{"status":"COMPLETED"}"#).unwrap();
        assert_eq!(completed.status, TransferOutcome::Completed);

        let declined: TransferResponse =
            serde_json::from_str(r#"{"status":"INSUFFICIENT_FUNDS"}"#).unwrap();
        assert_eq!(declined.status, TransferOutcome::InsufficientFunds);
    }
}
