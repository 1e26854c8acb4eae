//! Circuit breaker pattern for preventing cascading failures.
//!
//! A circuit breaker monitors operations and "opens" (stops allowing
//! requests) once the failure rate over a rolling window of recent calls
//! reaches a threshold, preventing cascading failures in distributed
//! systems.
//!
//! # States
//!
//! - **Closed**: Normal operation. Requests pass through. Outcomes are
//!   recorded in the rolling window.
//! - **Open**: Failure rate reached the threshold. Requests fail immediately
//!   for a cool-down period.
//! - **HalfOpen**: After the cool-down, limited requests are allowed to test
//!   recovery.
//!
//! Breakers are shared per named downstream resource through the
//! [`CircuitBreakerRegistry`]: one breaker per resource, created once,
//! reused across calls.
//!
//! # Example
//!
//! ```rust
//! use slotwise_runtime::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CircuitBreakerConfig::builder()
//!     .failure_rate_threshold(0.5)
//!     .cooldown(Duration::from_secs(10))
//!     .build();
//!
//! let breaker = CircuitBreaker::new(config);
//!
//! match breaker.call(|| async {
//!     // Your fallible operation
//!     Ok::<_, String>(42)
//! }).await {
//!     Ok(result) => println!("Success: {result}"),
//!     Err(e) => println!("Failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Failure rate (0.0 to 1.0) at which the circuit opens
    pub failure_rate_threshold: f64,
    /// Number of recent call outcomes kept in the rolling window
    pub window_size: usize,
    /// Minimum recorded outcomes before the rate can trip the breaker
    pub min_calls: usize,
    /// Duration to wait in Open state before transitioning to `HalfOpen`
    pub cooldown: Duration,
    /// Number of successes in `HalfOpen` state before closing the circuit
    pub success_threshold: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 0.5,
            window_size: 10,
            min_calls: 4,
            cooldown: Duration::from_secs(60),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub const fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder {
            failure_rate_threshold: None,
            window_size: None,
            min_calls: None,
            cooldown: None,
            success_threshold: None,
        }
    }
}

/// Builder for [`CircuitBreakerConfig`].
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfigBuilder {
    failure_rate_threshold: Option<f64>,
    window_size: Option<usize>,
    min_calls: Option<usize>,
    cooldown: Option<Duration>,
    success_threshold: Option<usize>,
}

impl CircuitBreakerConfigBuilder {
    /// Set the failure-rate threshold (0.0 to 1.0).
    ///
    /// The circuit opens once the rate of failures over the rolling window
    /// is at or above this value.
    #[must_use]
    pub const fn failure_rate_threshold(mut self, threshold: f64) -> Self {
        self.failure_rate_threshold = Some(threshold);
        self
    }

    /// Set the rolling window size.
    #[must_use]
    pub const fn window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Set the minimum number of recorded calls before the rate can trip.
    #[must_use]
    pub const fn min_calls(mut self, calls: usize) -> Self {
        self.min_calls = Some(calls);
        self
    }

    /// Set the cool-down duration.
    ///
    /// How long to wait in Open state before trying `HalfOpen`.
    #[must_use]
    pub const fn cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = Some(duration);
        self
    }

    /// Set the success threshold.
    ///
    /// Number of successes in `HalfOpen` state before closing the circuit.
    #[must_use]
    pub const fn success_threshold(mut self, threshold: usize) -> Self {
        self.success_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> CircuitBreakerConfig {
        let defaults = CircuitBreakerConfig::default();
        CircuitBreakerConfig {
            failure_rate_threshold: self
                .failure_rate_threshold
                .unwrap_or(defaults.failure_rate_threshold),
            window_size: self.window_size.unwrap_or(defaults.window_size),
            min_calls: self.min_calls.unwrap_or(defaults.min_calls),
            cooldown: self.cooldown.unwrap_or(defaults.cooldown),
            success_threshold: self.success_threshold.unwrap_or(defaults.success_threshold),
        }
    }
}

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Circuit is closed, requests pass through normally
    Closed,
    /// Circuit is open, requests fail immediately
    Open,
    /// Circuit is half-open, testing if service recovered
    HalfOpen,
}

/// Errors from circuit breaker operations.
#[derive(Error, Debug)]
pub enum CircuitBreakerError<E> {
    /// Circuit is open, request rejected
    #[error("Circuit breaker is open")]
    Open,
    /// Operation failed
    #[error("Operation failed: {0}")]
    Inner(E),
}

/// Internal state of the circuit breaker.
#[derive(Debug)]
struct CircuitBreakerState {
    state: State,
    /// Rolling window of recent outcomes; `true` marks a failure
    outcomes: VecDeque<bool>,
    success_count: usize,
    opened_at: Option<Instant>,
}

impl CircuitBreakerState {
    fn record_outcome(&mut self, failed: bool, window_size: usize) {
        if self.outcomes.len() == window_size {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(failed);
    }

    #[allow(clippy::cast_precision_loss)]
    fn failure_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let failures = self.outcomes.iter().filter(|failed| **failed).count();
        failures as f64 / self.outcomes.len() as f64
    }
}

/// Circuit breaker for preventing cascading failures.
///
/// Wraps operations and records their success/failure in a rolling window.
/// When the failure rate reaches the threshold, the circuit "opens" and
/// rejects requests for a cool-down period.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    name: Arc<str>,
    config: Arc<CircuitBreakerConfig>,
    state: Arc<RwLock<CircuitBreakerState>>,
    // Metrics
    total_calls: Arc<AtomicU64>,
    total_successes: Arc<AtomicU64>,
    total_failures: Arc<AtomicU64>,
    total_rejections: Arc<AtomicU64>,
}

impl CircuitBreaker {
    /// Create an anonymous circuit breaker with the given configuration.
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self::named("anonymous", config)
    }

    /// Create a named circuit breaker. The name tags log lines and metrics.
    #[must_use]
    pub fn named(name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            name: Arc::from(name),
            config: Arc::new(config),
            state: Arc::new(RwLock::new(CircuitBreakerState {
                state: State::Closed,
                outcomes: VecDeque::new(),
                success_count: 0,
                opened_at: None,
            })),
            total_calls: Arc::new(AtomicU64::new(0)),
            total_successes: Arc::new(AtomicU64::new(0)),
            total_failures: Arc::new(AtomicU64::new(0)),
            total_rejections: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The resource name this breaker guards.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current state of the circuit breaker.
    pub async fn state(&self) -> State {
        let state = self.state.read().await;
        state.state
    }

    /// Call an operation through the circuit breaker.
    ///
    /// # Errors
    ///
    /// Returns `CircuitBreakerError::Open` if the circuit is open.
    /// Returns `CircuitBreakerError::Inner` if the operation fails.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        // Check if we should allow this request
        if !self.can_attempt().await {
            self.total_rejections.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("circuit_breaker_rejections_total", "breaker" => self.name.to_string())
                .increment(1);
            tracing::warn!(breaker = %self.name, "Circuit breaker is OPEN, rejecting request");
            return Err(CircuitBreakerError::Open);
        }

        // Execute the operation
        match operation().await {
            Ok(result) => {
                self.on_success().await;
                self.total_successes.fetch_add(1, Ordering::Relaxed);
                Ok(result)
            }
            Err(err) => {
                self.on_failure().await;
                self.total_failures.fetch_add(1, Ordering::Relaxed);
                Err(CircuitBreakerError::Inner(err))
            }
        }
    }

    /// Check if the circuit breaker should allow an attempt.
    async fn can_attempt(&self) -> bool {
        let mut state = self.state.write().await;

        match state.state {
            State::Closed | State::HalfOpen => true,
            State::Open => {
                // Check if the cool-down has expired
                if let Some(opened_at) = state.opened_at {
                    if opened_at.elapsed() >= self.config.cooldown {
                        tracing::info!(
                            breaker = %self.name,
                            "Circuit breaker transitioning OPEN -> HALF_OPEN"
                        );
                        state.state = State::HalfOpen;
                        state.success_count = 0;
                        true
                    } else {
                        false
                    }
                } else {
                    false
                }
            }
        }
    }

    /// Handle successful operation.
    async fn on_success(&self) {
        let mut state = self.state.write().await;

        match state.state {
            State::Closed => {
                state.record_outcome(false, self.config.window_size);
            }
            State::HalfOpen => {
                state.success_count += 1;
                if state.success_count >= self.config.success_threshold {
                    tracing::info!(
                        breaker = %self.name,
                        successes = state.success_count,
                        "Circuit breaker transitioning HALF_OPEN -> CLOSED"
                    );
                    state.state = State::Closed;
                    state.outcomes.clear();
                    state.success_count = 0;
                    state.opened_at = None;
                }
            }
            State::Open => {
                // Late completion of a call admitted before the trip
                state.success_count = 0;
            }
        }
    }

    /// Handle failed operation.
    async fn on_failure(&self) {
        let mut state = self.state.write().await;

        match state.state {
            State::Closed => {
                state.record_outcome(true, self.config.window_size);
                let rate = state.failure_rate();
                if state.outcomes.len() >= self.config.min_calls
                    && rate >= self.config.failure_rate_threshold
                {
                    tracing::warn!(
                        breaker = %self.name,
                        failure_rate = rate,
                        threshold = self.config.failure_rate_threshold,
                        "Circuit breaker transitioning CLOSED -> OPEN"
                    );
                    state.state = State::Open;
                    state.outcomes.clear();
                    state.opened_at = Some(Instant::now());
                }
            }
            State::HalfOpen => {
                tracing::warn!(
                    breaker = %self.name,
                    "Circuit breaker transitioning HALF_OPEN -> OPEN (recovery failed)"
                );
                state.state = State::Open;
                state.outcomes.clear();
                state.success_count = 0;
                state.opened_at = Some(Instant::now());
            }
            State::Open => {
                state.opened_at = Some(Instant::now());
            }
        }
    }

    /// Get circuit breaker metrics.
    #[must_use]
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        CircuitBreakerMetrics {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            total_successes: self.total_successes.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            total_rejections: self.total_rejections.load(Ordering::Relaxed),
        }
    }

    /// Reset the circuit breaker to closed state.
    ///
    /// Useful for testing or manual intervention.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        tracing::info!(breaker = %self.name, "Circuit breaker manually reset to CLOSED");
        state.state = State::Closed;
        state.outcomes.clear();
        state.success_count = 0;
        state.opened_at = None;
    }
}

/// Metrics for circuit breaker monitoring.
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerMetrics {
    /// Total number of calls attempted
    pub total_calls: u64,
    /// Total number of successful calls
    pub total_successes: u64,
    /// Total number of failed calls
    pub total_failures: u64,
    /// Total number of rejected calls (circuit open)
    pub total_rejections: u64,
}

impl CircuitBreakerMetrics {
    /// Calculate success rate (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 1.0;
        }
        self.total_successes as f64 / self.total_calls as f64
    }

    /// Calculate rejection rate (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rejection_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.total_rejections as f64 / self.total_calls as f64
    }
}

/// Process-wide registry of named circuit breakers.
///
/// Each downstream resource gets exactly one breaker, created on first use
/// and shared by every caller afterwards, so the failure history of a
/// resource is tracked in one place.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    breakers: Mutex<HashMap<String, CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the breaker for `name`, creating it with `config` on first use.
    ///
    /// The configuration only applies at creation; later callers receive
    /// the existing breaker unchanged.
    #[must_use]
    pub fn get_or_create(&self, name: &str, config: &CircuitBreakerConfig) -> CircuitBreaker {
        let mut breakers = self
            .breakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        breakers
            .entry(name.to_string())
            .or_insert_with(|| CircuitBreaker::named(name, config.clone()))
            .clone()
    }
}
