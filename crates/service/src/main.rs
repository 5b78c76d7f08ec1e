//! Insight Service - predictive coaching insights for the learning product
//!
//! Exposes five predictive models and the coaching insights aggregation
//! endpoint over HTTP. Models are trained in memory at startup.

use anyhow::Result;
use coach_lib::{
    datasource,
    health::{components, HealthRegistry},
    observability::{CoachMetrics, StructuredLogger},
    predictor::ModelRegistry,
};
use insight_service::{api, config};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting insight-service");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(
        api_port = config.api_port,
        data_source = %config.data_source,
        "Service configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODELS).await;
    health_registry.register(components::DATA_SOURCE).await;

    // Initialize metrics and structured logger
    let metrics = CoachMetrics::new();
    let logger = StructuredLogger::new("insight-service");

    // Build the model registry and train on synthetic data
    let registry = Arc::new(ModelRegistry::with_default_models());
    match registry.train_all(config.training_samples, config.training_seed) {
        Ok(reports) => {
            for report in &reports {
                logger.log_model_trained(report.model, report.samples, report.loss, report.accuracy);
                metrics.set_model_info(report.model, true);
            }
            metrics.set_models_loaded(reports.len() as i64);
            health_registry.set_healthy(components::MODELS).await;
        }
        Err(err) => {
            // Keep serving: the context fallback path needs no models
            error!(error = %err, "Startup training failed");
            health_registry
                .set_unhealthy(components::MODELS, err.to_string())
                .await;
        }
    }

    // Select the data source variant
    let data_source = datasource::select(&config.data_source)?;
    if data_source.describe() == "disabled" {
        health_registry
            .set_degraded(components::DATA_SOURCE, "serving context-only insights")
            .await;
    }

    logger.log_startup(SERVICE_VERSION, data_source.describe());

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        registry,
        data_source,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
