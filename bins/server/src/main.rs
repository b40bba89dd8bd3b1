//! Worklio API Server
//!
//! Main entry point for the Worklio currency service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worklio_api::{AppState, create_router};
use worklio_core::currency::RateStore;
use worklio_db::{ExchangeRateRepository, connect_with};
use worklio_jobs::build_scheduler;
use worklio_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worklio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    let rates = config
        .exchange_rates
        .resolve()
        .context("Invalid exchange rate configuration")?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let store: Arc<dyn RateStore> = Arc::new(ExchangeRateRepository::new(db));

    // Start the refresh loop; reads never wait on it
    let shutdown = CancellationToken::new();
    let scheduler = build_scheduler(&rates, store.clone())?.spawn(shutdown.clone());

    let state = AppState::from_settings(store, &rates);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    scheduler.await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        }
        () = shutdown.cancelled() => {}
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
