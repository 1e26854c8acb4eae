//! Error type shared by the HTTP clients.

use thiserror::Error;

/// Errors from cross-service HTTP calls.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// The collaborator could not be reached or answered with a server
    /// error. Kept separate from domain outcomes: callers must not
    /// mistake an unreachable payment service for a declined payment.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        /// Logical service name, e.g. `"user-service"`
        service: &'static str,
        /// Transport or status detail
        reason: String,
    },

    /// The collaborator answered 404 for the requested entity.
    #[error("{resource} with id {id} wasn't found")]
    NotFound {
        /// Entity kind, e.g. `"Booking"`
        resource: &'static str,
        /// The identifier that missed
        id: String,
    },

    /// The collaborator answered with an unexpected status.
    #[error("unexpected status {status} from {service}: {body}")]
    UnexpectedStatus {
        /// Logical service name
        service: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response from {service}: {reason}")]
    InvalidResponse {
        /// Logical service name
        service: &'static str,
        /// Decode failure detail
        reason: String,
    },

    /// The client itself could not be constructed.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// True when the failure is infrastructure, not a domain answer.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
