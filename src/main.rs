//! pricewatch server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pricewatch::api;
use pricewatch::app_state::AppState;
use pricewatch::config::{LogFormat, PriceWatchConfig};
use pricewatch::domain::ProductRegistry;
use pricewatch::persistence::{EphemeralRepository, PostgresPersistence, ProductRepository};
use pricewatch::probe::{HttpPriceExtractor, PriceProbe};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PriceWatchConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting pricewatch");

    // Build persistence layer
    let repository: Arc<dyn ProductRepository> = if config.persistence_enabled {
        let persistence = PostgresPersistence::connect(&config)
            .await
            .context("connecting to postgres")?;
        persistence.migrate().await.context("running migrations")?;
        tracing::info!("postgres persistence enabled");
        Arc::new(persistence)
    } else {
        tracing::warn!("persistence disabled, products are kept in memory only");
        Arc::new(EphemeralRepository)
    };

    // Build domain layer
    let registry = Arc::new(ProductRegistry::new(repository));
    let loaded = registry
        .load_from_repository()
        .await
        .context("loading stored products")?;
    tracing::info!(products = loaded, "registry loaded");

    // Build probe and service layer
    let extractor = HttpPriceExtractor::new(&config.probe_user_agent, config.probe_timeout)?;
    let probe = PriceProbe::new(Arc::new(extractor), config.probe_timeout);
    let app_state = AppState::new(
        registry,
        probe,
        config.refresh_max_concurrency,
        Some(config.refresh_deadline),
    );

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
