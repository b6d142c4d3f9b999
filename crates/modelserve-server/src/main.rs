//! modelserve
//!
//! Loads every configured model artifact at startup and serves predictions
//! over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use modelserve_models::ModelRegistry;
use modelserve_server::{create_router, AppState, Cli, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting modelserve");

    let config = ServerConfig::load(&cli.config, &cli)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;
    info!("Configuration loaded successfully");
    info!("Models directory: {}", config.registry.models_dir.display());
    info!("Configured models: {}", config.registry.models.len());

    let metrics_handle = init_metrics()?;

    // A model that fails to load is fatal
    let registry = ModelRegistry::load(&config.registry).context("failed to load models")?;
    metrics::gauge!("modelserve_models_loaded").set(registry.len() as f64);
    info!("Loaded {} models: {:?}", registry.len(), registry.model_names());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.bind_address()))?;

    let state = AppState::new(config, Arc::new(registry)).with_metrics(metrics_handle);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("modelserve=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelserve=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "modelserve_requests_total",
        "Total number of prediction requests by model"
    );
    metrics::describe_counter!(
        "modelserve_predictions_total",
        "Total number of prediction outcomes by model and outcome"
    );
    metrics::describe_histogram!(
        "modelserve_prediction_latency_us",
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds by model"
    );
    metrics::describe_gauge!("modelserve_models_loaded", "Number of models in the registry");

    info!("Metrics exporter initialized");
    Ok(handle)
}
