//! Booking service entry point.
//!
//! Wires the Postgres booking store, the payment and parking HTTP clients,
//! the Redpanda publisher and the circuit-breaker registry into the
//! orchestrator, then serves the REST API.

use booking_service::{build_router, AppState, BookingOrchestrator, Config};
use slotwise_clients::{ClientConfig, HttpPaymentGateway, HttpSlotGateway};
use slotwise_core::environment::SystemClock;
use slotwise_postgres::{connect_pool, PostgresBookingStore};
use slotwise_redpanda::RedpandaEventBus;
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
                .unwrap_or_else(|_| "info,booking_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        port = config.server.port,
        postgres = %config.postgres.url,
        redpanda = %config.redpanda.brokers,
        "Starting booking service"
    );

    // Metrics recorder
    let mut metrics = MetricsServer::new(
        format!("{}:{}", config.server.metrics_host, config.server.metrics_port).parse()?,
    );
    metrics.start()?;

    // Storage
    let pool = connect_pool(&config.postgres).await?;
    let bookings = PostgresBookingStore::new(pool);
    bookings.ensure_schema().await?;

    // Downstream clients
    let client_config = |base: &str| {
        ClientConfig::new(base)
            .connect_timeout(config.downstream.connect_timeout)
            .request_timeout(config.downstream.request_timeout)
    };
    let payments = HttpPaymentGateway::new(client_config(&config.downstream.payment_base_url))?;
    let slots = HttpSlotGateway::new(client_config(&config.downstream.parking_base_url))?;

    // Event publisher
    let publisher = RedpandaEventBus::new(&config.redpanda.brokers)?;

    // Orchestrator with the shared breaker registry
    let breakers = CircuitBreakerRegistry::new();
    let bookings = Arc::new(bookings);
    let orchestrator = BookingOrchestrator::new(
        bookings.clone(),
        Arc::new(payments),
        Arc::new(slots),
        Arc::new(publisher),
        Arc::new(SystemClock),
        &breakers,
        &config.downstream,
        config.redpanda.booking_topic.clone(),
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        bookings,
        clock: Arc::new(SystemClock),
        metrics: Arc::new(metrics),
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Booking service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
