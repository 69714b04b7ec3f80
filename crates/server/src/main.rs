//! Habitability prediction server
//!
//! Loads the frozen classifier once at startup and serves predictions over
//! HTTP. The process refuses to start without a loadable artifact.

use anyhow::{Context, Result};
use habitability_core::{
    health::{components, HealthRegistry},
    FeatureEncoder, HabitabilityPredictor, PredictorMetrics, StructuredLogger,
};
use habitability_server::{api, ServerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting habitability-server");

    let config = ServerConfig::load()?;
    info!(
        model_path = %config.model_path.display(),
        api_port = config.api_port,
        "Server configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ENCODER).await;
    if let Err(e) = FeatureEncoder::verify_schema() {
        error!(error = %e, kind = e.kind(), "Encoder column layout does not match the classifier");
        health_registry
            .set_unhealthy(components::ENCODER, e.to_string())
            .await;
    }

    let metrics = PredictorMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    // No degraded mode: without a classifier nothing can be served.
    let predictor = match HabitabilityPredictor::load(
        &config.model_path,
        config.model_sha256.as_deref(),
    ) {
        Ok(predictor) => predictor.with_decision_threshold(config.decision_threshold),
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Classifier artifact could not be loaded");
            return Err(e).context("Refusing to start without a classifier");
        }
    };

    let backend = predictor.service().handle().get()?.backend();
    let artifact = config
        .model_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    health_registry.register(components::CLASSIFIER).await;
    metrics.set_classifier_info(backend.as_str(), &artifact);
    logger.log_classifier_loaded(&artifact, backend.as_str());
    logger.log_startup(SERVER_VERSION, backend.as_str());

    let app_state = Arc::new(api::AppState::new(
        Arc::new(predictor),
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
    };
    api::serve(config.api_port, app_state, shutdown).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
