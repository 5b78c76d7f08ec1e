//! Observability for the insight service
//!
//! Prometheus metrics (request/prediction latency, fallback counts, model
//! info) and structured JSON event logging via tracing.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once per process)
static GLOBAL_METRICS: OnceLock<CoachMetricsInner> = OnceLock::new();

struct CoachMetricsInner {
    insight_latency_seconds: Histogram,
    prediction_latency_seconds: Histogram,
    insights_generated: IntCounter,
    fallback_insights: IntCounter,
    predictions: IntCounter,
    prediction_errors: IntCounter,
    models_loaded: IntGauge,
    model_info: GaugeVec,
}

impl CoachMetricsInner {
    fn new() -> Self {
        Self {
            insight_latency_seconds: register_histogram!(
                "coach_service_insight_latency_seconds",
                "Time spent generating a coaching insights payload",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register insight_latency_seconds"),

            prediction_latency_seconds: register_histogram!(
                "coach_service_prediction_latency_seconds",
                "Time spent running a single model prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            insights_generated: register_int_counter!(
                "coach_service_insights_generated_total",
                "Total number of insight payloads generated"
            )
            .expect("Failed to register insights_generated_total"),

            fallback_insights: register_int_counter!(
                "coach_service_fallback_insights_total",
                "Insight payloads served from the context-only fallback path"
            )
            .expect("Failed to register fallback_insights_total"),

            predictions: register_int_counter!(
                "coach_service_predictions_total",
                "Total number of individual model predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors: register_int_counter!(
                "coach_service_prediction_errors_total",
                "Total number of failed model predictions"
            )
            .expect("Failed to register prediction_errors_total"),

            models_loaded: register_int_gauge!(
                "coach_service_models_loaded",
                "Number of models available in the registry"
            )
            .expect("Failed to register models_loaded"),

            model_info: register_gauge_vec!(
                "coach_service_model_info",
                "Information about registered models",
                &["model", "trained"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Lightweight handle to the global metrics instance
#[derive(Clone)]
pub struct CoachMetrics {
    _private: (),
}

impl Default for CoachMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CoachMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(CoachMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &CoachMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_insight_latency(&self, duration_secs: f64) {
        self.inner().insight_latency_seconds.observe(duration_secs);
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .observe(duration_secs);
    }

    pub fn inc_insights_generated(&self) {
        self.inner().insights_generated.inc();
    }

    pub fn inc_fallback_insights(&self) {
        self.inner().fallback_insights.inc();
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn set_models_loaded(&self, count: i64) {
        self.inner().models_loaded.set(count);
    }

    /// Record a model's presence and training state
    pub fn set_model_info(&self, model: &str, trained: bool) {
        self.inner()
            .model_info
            .with_label_values(&[model, if trained { "true" } else { "false" }])
            .set(1.0);
    }
}

/// Consistent JSON-formatted logging for significant service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, data_source: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            data_source = %data_source,
            "Insight service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Insight service shutting down"
        );
    }

    pub fn log_model_trained(&self, model: &str, samples: usize, loss: f64, accuracy: f64) {
        info!(
            event = "model_trained",
            service = %self.service,
            model = %model,
            samples = samples,
            loss = loss,
            accuracy = accuracy,
            "Model trained"
        );
    }

    pub fn log_insights_generated(&self, user_id: &str, source: &str, duration_secs: f64) {
        info!(
            event = "insights_generated",
            service = %self.service,
            user_id = %user_id,
            source = %source,
            duration_secs = duration_secs,
            "Coaching insights generated"
        );
    }

    pub fn log_fallback(&self, user_id: &str, reason: &str) {
        info!(
            event = "fallback_insights",
            service = %self.service,
            user_id = %user_id,
            reason = %reason,
            "Served context-only fallback insights"
        );
    }

    pub fn log_prediction_error(&self, model: &str, error: &str) {
        warn!(
            event = "prediction_error",
            service = %self.service,
            model = %model,
            error = %error,
            "Model prediction failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_handle_records_without_panicking() {
        let metrics = CoachMetrics::new();
        metrics.observe_insight_latency(0.002);
        metrics.observe_prediction_latency(0.0004);
        metrics.inc_insights_generated();
        metrics.inc_fallback_insights();
        metrics.inc_predictions();
        metrics.inc_prediction_errors();
        metrics.set_models_loaded(5);
        metrics.set_model_info("performance-predictor", true);
    }

    #[test]
    fn logger_keeps_service_name() {
        let logger = StructuredLogger::new("insight-service");
        assert_eq!(logger.service, "insight-service");
    }
}
