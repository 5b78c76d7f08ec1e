//! HTTP API: prediction endpoints, coaching insights, health and metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use coach_lib::{
    datasource::DataSource,
    health::{ComponentStatus, HealthRegistry},
    insights::{InsightEngine, InsightSource},
    models::{CoachContext, InsightsPayload, ModelKind},
    observability::{CoachMetrics, StructuredLogger},
    predictor::{ModelMetrics, ModelRegistry, TrainingReport},
    PredictionError,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub const SERVICE_NAME: &str = "Learning Coach Insight Service";

/// Shared application state
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub engine: InsightEngine,
    pub data_source: Arc<dyn DataSource>,
    pub health_registry: HealthRegistry,
    pub metrics: CoachMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        registry: Arc<ModelRegistry>,
        data_source: Arc<dyn DataSource>,
        health_registry: HealthRegistry,
        metrics: CoachMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            engine: InsightEngine::new(registry.clone()),
            registry,
            data_source,
            health_registry,
            metrics,
            logger,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub models_loaded: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub model_type: String,
    pub trained: bool,
    pub features: Vec<String>,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<f64>,
    pub confidence: f64,
    pub explanation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainRequest {
    pub inputs: Vec<Vec<f64>>,
    pub outputs: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    pub status: String,
    pub report: TrainingReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn prediction_error_response(err: &PredictionError) -> ApiError {
    match err {
        PredictionError::UnknownModel(name) => {
            api_error(StatusCode::NOT_FOUND, format!("Model {} not found", name))
        }
        PredictionError::Untrained(name) => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Model {} is not trained", name),
        ),
        PredictionError::InvalidTrainingData(reason) => api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Invalid training data: {}", reason),
        ),
        PredictionError::Failed { model, reason } => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Prediction failed for {}: {}", model, reason),
        ),
    }
}

fn model_type(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::LearningPath | ModelKind::Performance | ModelKind::SkillGap => {
            "linear_regression"
        }
        ModelKind::LearningStyle | ModelKind::Motivation => "softmax_classifier",
    }
}

fn explanation_for(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::LearningPath => "Recommended learning path based on user performance data",
        ModelKind::Performance => "Performance prediction for completion probability",
        ModelKind::LearningStyle => {
            "Detected learning style preferences (visual, kinesthetic, reading, auditory)"
        }
        ModelKind::SkillGap => "Identified skill gaps and areas needing improvement",
        ModelKind::Motivation => "Motivational analysis and engagement predictions",
    }
}

/// Service info endpoint
async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        models_loaded: state
            .registry
            .iter()
            .map(|m| m.kind().name().to_string())
            .collect(),
    })
}

/// Health check - 200 while operational, 503 when a component has failed
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check - 200 once startup training has completed
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// List the registered models with training state and metrics
async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelListResponse> {
    let models = state
        .registry
        .iter()
        .map(|model| ModelInfo {
            name: model.kind().name().to_string(),
            model_type: model_type(model.kind()).to_string(),
            trained: model.is_trained(),
            features: model.feature_names().iter().map(|f| f.to_string()).collect(),
            metrics: model.metrics(),
        })
        .collect();

    Json(ModelListResponse { models })
}

/// Run one model on caller-supplied features
async fn predict(
    State(state): State<Arc<AppState>>,
    Path(model_name): Path<String>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state
        .registry
        .get_by_name(&model_name)
        .map_err(|e| prediction_error_response(&e))?;

    let start = Instant::now();
    let result = model.predict(&request.features);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions();
            Ok(Json(PredictResponse {
                prediction: prediction.into_vector(),
                confidence: 0.8,
                explanation: explanation_for(model.kind()).to_string(),
            }))
        }
        Err(err) => {
            state.metrics.inc_prediction_errors();
            state
                .logger
                .log_prediction_error(model.kind().name(), &err.to_string());
            Err(prediction_error_response(&err))
        }
    }
}

/// Retrain one model in place from caller-supplied matrices
async fn train(
    State(state): State<Arc<AppState>>,
    Path(model_name): Path<String>,
    Json(request): Json<TrainRequest>,
) -> Result<Json<TrainResponse>, ApiError> {
    let model = state
        .registry
        .get_by_name(&model_name)
        .map_err(|e| prediction_error_response(&e))?;

    let report = model
        .train(&request.inputs, &request.outputs)
        .map_err(|e| prediction_error_response(&e))?;

    state.metrics.set_model_info(model.kind().name(), true);
    state.logger.log_model_trained(
        report.model,
        report.samples,
        report.loss,
        report.accuracy,
    );

    Ok(Json(TrainResponse {
        message: format!("Model {} training completed successfully", model_name),
        status: "success".to_string(),
        report,
    }))
}

/// Generate the aggregate coaching insights payload
async fn coach_insights(
    State(state): State<Arc<AppState>>,
    Json(ctx): Json<CoachContext>,
) -> Result<Json<InsightsPayload>, ApiError> {
    let start = Instant::now();

    let activity = match state.data_source.fetch_user_activity(&ctx.user_id).await {
        Ok(activity) => activity,
        Err(err) => {
            // A failing data source degrades to the fallback path
            warn!(user_id = %ctx.user_id, error = %err, "User data fetch failed");
            None
        }
    };

    match state.engine.generate(activity.as_ref(), &ctx, Utc::now()) {
        Ok(generated) => {
            let elapsed = start.elapsed().as_secs_f64();
            state.metrics.observe_insight_latency(elapsed);
            state.metrics.inc_insights_generated();
            if generated.source == InsightSource::ContextFallback {
                state.metrics.inc_fallback_insights();
                state
                    .logger
                    .log_fallback(&ctx.user_id, "no user activity available");
            }
            state
                .logger
                .log_insights_generated(&ctx.user_id, generated.source.as_str(), elapsed);
            Ok(Json(generated.payload))
        }
        Err(err) => {
            error!(user_id = %ctx.user_id, error = %err, "Insights generation failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "insights generation failed",
            ))
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/models", get(list_models))
        .route("/predict/:model", post(predict))
        .route("/train/:model", post(train))
        .route("/coach/insights", post(coach_insights))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
