//! Insight aggregation and the end-to-end generation engine

mod aggregator;
pub mod fallback;

pub use aggregator::{
    InsightAggregator, ModelOutputs, GAP_HIGH_THRESHOLD, GAP_INCLUDE_THRESHOLD, MAX_PATH_TOPICS,
    MAX_SKILL_GAPS, PREDICTION_CONFIDENCE,
};

use crate::error::{InsightsError, PredictionError};
use crate::features::FeatureExtractor;
use crate::models::{CoachContext, FeatureSet, InsightsPayload, ModelKind, UserActivityRecord};
use crate::predictor::ModelRegistry;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// Which path produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource {
    /// Full pipeline: features extracted, all five models consulted
    Models,
    /// Context-only derivation, models not called
    ContextFallback,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Models => "models",
            InsightSource::ContextFallback => "context_fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedInsights {
    pub payload: InsightsPayload,
    pub source: InsightSource,
}

/// Drives extraction, prediction and aggregation for one request
pub struct InsightEngine {
    registry: Arc<ModelRegistry>,
    extractor: FeatureExtractor,
    aggregator: InsightAggregator,
}

impl InsightEngine {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            extractor: FeatureExtractor::new(),
            aggregator: InsightAggregator::new(),
        }
    }

    /// Generate insights for one user. Missing activity or a failing model
    /// falls back to the context-only path rather than erroring.
    pub fn generate(
        &self,
        activity: Option<&UserActivityRecord>,
        ctx: &CoachContext,
        now: DateTime<Utc>,
    ) -> Result<GeneratedInsights, InsightsError> {
        let Some(user) = activity else {
            return Ok(GeneratedInsights {
                payload: fallback::from_context(ctx),
                source: InsightSource::ContextFallback,
            });
        };

        let features = self.extractor.extract(Some(user), now);
        let outputs = match self.predict_all(&features) {
            Ok(outputs) => outputs,
            Err(err) => {
                warn!(user_id = %ctx.user_id, error = %err, "Prediction unavailable, using context fallback");
                return Ok(GeneratedInsights {
                    payload: fallback::from_context(ctx),
                    source: InsightSource::ContextFallback,
                });
            }
        };

        Ok(GeneratedInsights {
            payload: self.aggregator.aggregate(&outputs, user, now),
            source: InsightSource::Models,
        })
    }

    fn predict_all(&self, features: &FeatureSet) -> Result<ModelOutputs, PredictionError> {
        Ok(ModelOutputs {
            learning_path: self
                .registry
                .predict(ModelKind::LearningPath, features.for_model(ModelKind::LearningPath))?,
            performance: self
                .registry
                .predict(ModelKind::Performance, features.for_model(ModelKind::Performance))?,
            learning_style: self.registry.predict(
                ModelKind::LearningStyle,
                features.for_model(ModelKind::LearningStyle),
            )?,
            skill_gap: self
                .registry
                .predict(ModelKind::SkillGap, features.for_model(ModelKind::SkillGap))?,
            motivation: self
                .registry
                .predict(ModelKind::Motivation, features.for_model(ModelKind::Motivation))?,
        })
    }
}
