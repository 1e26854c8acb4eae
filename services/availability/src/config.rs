//! Configuration for the availability service.

use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Parking service base URL
    pub parking_base_url: String,
    /// Per-call connect timeout
    pub connect_timeout: Duration,
    /// Per-call request timeout
    pub request_timeout: Duration,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Metrics endpoint advertised host
    pub metrics_host: String,
    /// Metrics endpoint advertised port
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8082),
                metrics_host: env::var("METRICS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                metrics_port: env::var("METRICS_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(9094),
            },
            parking_base_url: env::var("PARKING_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8084".to_string()),
            connect_timeout: Duration::from_secs(
                env::var("DOWNSTREAM_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            request_timeout: Duration::from_secs(
                env::var("DOWNSTREAM_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
