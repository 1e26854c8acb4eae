//! `PostgreSQL` repository implementations for the Slotwise platform.
//!
//! Each store implements the matching repository trait from
//! `slotwise-core` using runtime-checked sqlx queries. The crate also owns
//! pool construction (with startup retry, so a service racing its database
//! comes up cleanly) and per-store schema bootstrap via
//! `CREATE TABLE IF NOT EXISTS`.
//!
//! # Example
//!
//! ```ignore
//! use slotwise_postgres::{connect_pool, PostgresConfig, PostgresUserStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect_pool(&PostgresConfig::from_url(
//!         "postgres://localhost/slotwise_users",
//!     ))
//!     .await?;
//!     let store = PostgresUserStore::new(pool);
//!     store.ensure_schema().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bookings;
pub mod payments;
pub mod slots;
pub mod users;

use slotwise_core::DomainError;
use slotwise_runtime::retry::{retry_with_backoff, RetryPolicy};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub use bookings::PostgresBookingStore;
pub use payments::PostgresPaymentStore;
pub use slots::PostgresParkingSlotStore;
pub use users::PostgresUserStore;

/// `PostgreSQL` connection configuration.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
    /// Idle timeout in seconds (connections idle longer than this are closed)
    pub idle_timeout: u64,
}

impl PostgresConfig {
    /// Config with default pool sizing for the given URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: 30,
            idle_timeout: 600,
        }
    }
}

/// Build a connection pool, retrying while the database comes up.
///
/// # Errors
///
/// Returns [`DomainError::Storage`] once the retry budget is exhausted.
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let policy = RetryPolicy::builder()
        .max_retries(5)
        .initial_delay(Duration::from_millis(500))
        .max_delay(Duration::from_secs(5))
        .build();

    retry_with_backoff(policy, || async {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(&config.url)
            .await
    })
    .await
    .map_err(|e| DomainError::Storage(format!("Failed to connect to Postgres: {e}")))
}

pub(crate) fn storage_error(context: &str, e: &sqlx::Error) -> DomainError {
    DomainError::Storage(format!("{context}: {e}"))
}
