//! # Slotwise Runtime
//!
//! Resilience and observability primitives shared by the Slotwise services.
//!
//! ## Core Components
//!
//! - **Circuit breaker**: per-resource failure tracking with explicit
//!   Closed / Open / HalfOpen states and a process-wide named registry
//! - **Retry**: exponential backoff for startup-time transient failures
//! - **Metrics**: Prometheus recorder and the platform's metric families
//!
//! ## Example
//!
//! ```rust
//! use slotwise_runtime::circuit_breaker::{CircuitBreakerConfig, CircuitBreakerRegistry};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let registry = CircuitBreakerRegistry::new();
//! let config = CircuitBreakerConfig::builder()
//!     .failure_rate_threshold(0.5)
//!     .cooldown(Duration::from_secs(10))
//!     .build();
//!
//! // One breaker per downstream resource, shared across calls
//! let breaker = registry.get_or_create("payment", &config);
//! let result = breaker.call(|| async { Ok::<_, String>("COMPLETED") }).await;
//! # let _ = result;
//! # }
//! ```

/// Retry logic with exponential backoff
pub mod retry;

/// Circuit breaker pattern for preventing cascading failures
pub mod circuit_breaker;

/// Prometheus metrics for observability
pub mod metrics;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerRegistry,
};
pub use metrics::MetricsServer;
pub use retry::{retry_with_backoff, RetryPolicy};
