//! Payment service entry point.

use payment_service::{build_router, AppState, Config, PaymentProcessor};
use slotwise_clients::{ClientConfig, HttpBookingDirectory, HttpUserLedger};
use slotwise_core::environment::SystemClock;
use slotwise_postgres::{connect_pool, PostgresPaymentStore};
use slotwise_runtime::circuit_breaker::CircuitBreakerRegistry;
use slotwise_runtime::MetricsServer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payment_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        port = config.server.port,
        postgres = %config.postgres.url,
        "Starting payment service"
    );

    // Metrics recorder
    let mut metrics = MetricsServer::new(
        format!("{}:{}", config.server.metrics_host, config.server.metrics_port).parse()?,
    );
    metrics.start()?;

    // Storage
    let pool = connect_pool(&config.postgres).await?;
    let ledger = PostgresPaymentStore::new(pool);
    ledger.ensure_schema().await?;

    // Downstream clients
    let client_config = |base: &str| {
        ClientConfig::new(base)
            .connect_timeout(config.downstream.connect_timeout)
            .request_timeout(config.downstream.request_timeout)
    };
    let bookings = HttpBookingDirectory::new(client_config(&config.downstream.booking_base_url))?;
    let users = HttpUserLedger::new(client_config(&config.downstream.user_base_url))?;

    let breakers = CircuitBreakerRegistry::new();
    let processor = PaymentProcessor::new(
        Arc::new(ledger),
        Arc::new(bookings),
        Arc::new(users),
        Arc::new(SystemClock),
        &breakers,
        &config.downstream,
    );

    let state = AppState {
        processor: Arc::new(processor),
        metrics: Arc::new(metrics),
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Payment service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
