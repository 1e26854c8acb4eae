//! Domain error type shared by repositories and services.

use thiserror::Error;

/// Errors surfaced by domain operations and repositories.
///
/// `NotFound`, `EmailAlreadyExists` and `InvalidRequest` are client-visible
/// and map onto 4xx responses at the web boundary; `Storage` covers
/// infrastructure failures and maps onto 500.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The requested entity does not exist.
    #[error("{resource} with id {id} wasn't found")]
    NotFound {
        /// Entity kind, e.g. `"Booking"`
        resource: &'static str,
        /// The identifier that missed
        id: String,
    },

    /// A user with this email is already registered.
    #[error("email {0} already exists")]
    EmailAlreadyExists(String),

    /// Malformed or missing input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource_and_id() {
        let err = DomainError::not_found("Booking", "b-1");
        assert_eq!(err.to_string(), "Booking with id b-1 wasn't found");
    }
}
