//! ML prediction engine
//!
//! Five small in-process models sit behind the `Model` trait: linear
//! regressors for learning-path, performance and skill-gap outputs, and
//! softmax classifiers for learning-style and motivation. The registry is
//! built once at startup and shared read-only across requests.

mod linear;
mod softmax;
mod synthetic;

pub use linear::{Activation, LinearModel};
pub use softmax::SoftmaxModel;
pub use synthetic::training_data;

use crate::error::PredictionError;
use crate::models::ModelKind;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Normalized model output, resolved at the adapter boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Prediction {
    /// First (or only) output value; 0 for an empty vector
    pub fn scalar(&self) -> f64 {
        match self {
            Prediction::Scalar(v) => *v,
            Prediction::Vector(v) => v.first().copied().unwrap_or(0.0),
        }
    }

    pub fn into_vector(self) -> Vec<f64> {
        match self {
            Prediction::Scalar(v) => vec![v],
            Prediction::Vector(v) => v,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Prediction::Scalar(v) => std::slice::from_ref(v),
            Prediction::Vector(v) => v,
        }
    }
}

/// Quality metrics recorded at training time
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub loss: f64,
    pub samples: usize,
}

/// Summary of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model: &'static str,
    pub samples: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// Trait for prediction implementations
pub trait Model: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    fn is_trained(&self) -> bool;

    /// Generate a prediction. Inputs are fitted to `input_dim` first;
    /// wrong-length vectors are padded or truncated, never rejected.
    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictionError>;

    /// Retrain in place from feature rows and target rows
    fn train(
        &self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> Result<TrainingReport, PredictionError>;

    fn feature_names(&self) -> &'static [&'static str];

    fn metrics(&self) -> ModelMetrics;
}

/// Feature standardization fitted on training data
#[derive(Debug, Clone)]
pub(crate) struct Scaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Scaler {
    pub(crate) fn fit(rows: &[Vec<f64>], dim: usize) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = vec![0.0; dim];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let mut std = vec![0.0; dim];
        for row in rows {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2) / n;
            }
        }
        for s in &mut std {
            // sigma floor avoids division by zero on constant features
            *s = s.sqrt() + 1e-8;
        }
        Self { mean, std }
    }

    pub(crate) fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.std)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }
}

/// Registry of the five models, immutable after construction
pub struct ModelRegistry {
    models: HashMap<ModelKind, Arc<dyn Model>>,
}

impl ModelRegistry {
    /// Build the standard five-model registry, untrained
    pub fn with_default_models() -> Self {
        let mut models: HashMap<ModelKind, Arc<dyn Model>> = HashMap::new();
        models.insert(
            ModelKind::LearningPath,
            Arc::new(LinearModel::learning_path()),
        );
        models.insert(ModelKind::Performance, Arc::new(LinearModel::performance()));
        models.insert(
            ModelKind::LearningStyle,
            Arc::new(SoftmaxModel::learning_style()),
        );
        models.insert(ModelKind::SkillGap, Arc::new(LinearModel::skill_gap()));
        models.insert(ModelKind::Motivation, Arc::new(SoftmaxModel::motivation()));
        Self { models }
    }

    pub fn get(&self, kind: ModelKind) -> Option<&Arc<dyn Model>> {
        self.models.get(&kind)
    }

    /// Look up by wire name, e.g. "skill-gap-analyzer"
    pub fn get_by_name(&self, name: &str) -> Result<&Arc<dyn Model>, PredictionError> {
        let kind =
            ModelKind::parse(name).ok_or_else(|| PredictionError::UnknownModel(name.to_string()))?;
        self.models
            .get(&kind)
            .ok_or_else(|| PredictionError::UnknownModel(name.to_string()))
    }

    /// Models in stable wire-name order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Model>> {
        ModelKind::ALL.iter().filter_map(|kind| self.models.get(kind))
    }

    /// Adapter entry point: fit the input to the model's dimension and
    /// normalize the output shape
    pub fn predict(&self, kind: ModelKind, features: &[f64]) -> Result<Prediction, PredictionError> {
        let model = self
            .models
            .get(&kind)
            .ok_or_else(|| PredictionError::UnknownModel(kind.name().to_string()))?;
        model.predict(features)
    }

    /// Train every model on deterministic synthetic data
    pub fn train_all(
        &self,
        samples: usize,
        seed: u64,
    ) -> Result<Vec<TrainingReport>, PredictionError> {
        let mut reports = Vec::with_capacity(self.models.len());
        for (offset, kind) in ModelKind::ALL.iter().enumerate() {
            let Some(model) = self.models.get(kind) else {
                continue;
            };
            let (inputs, targets) = training_data(*kind, samples, seed.wrapping_add(offset as u64));
            let report = model.train(&inputs, &targets)?;
            debug!(
                model = %kind,
                samples = report.samples,
                loss = report.loss,
                "Model trained"
            );
            reports.push(report);
        }
        Ok(reports)
    }
}
