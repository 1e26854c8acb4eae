//! User service entry point.

use slotwise_postgres::{connect_pool, PostgresUserStore};
use slotwise_runtime::MetricsServer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_service::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,user_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        port = config.server.port,
        postgres = %config.postgres.url,
        "Starting user service"
    );

    // Metrics recorder
    let mut metrics = MetricsServer::new(
        format!("{}:{}", config.server.metrics_host, config.server.metrics_port).parse()?,
    );
    metrics.start()?;

    // Storage
    let pool = connect_pool(&config.postgres).await?;
    let users = PostgresUserStore::new(pool);
    users.ensure_schema().await?;

    let state = AppState {
        users: Arc::new(users),
        metrics: Arc::new(metrics),
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "User service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
