//! Multi-output linear regression trained by batch gradient descent

use super::{Model, ModelMetrics, Prediction, Scaler, TrainingReport};
use crate::error::PredictionError;
use crate::features::fit_dimension;
use crate::models::{ModelKind, LEARNING_PATH_DIM, PERFORMANCE_DIM, SKILL_GAP_DIM};
use std::sync::RwLock;

const LEARNING_RATE: f64 = 0.05;
const EPOCHS: usize = 500;

/// Output activation applied after the linear map
#[derive(Debug, Clone, Copy)]
pub enum Activation {
    /// Logistic squash to (0,1), used for topic relevance scores
    Sigmoid,
    /// Hard clamp to [0,1], used for probabilities and gap scores
    Clamp,
}

impl Activation {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-value).exp()),
            Activation::Clamp => value.clamp(0.0, 1.0),
        }
    }
}

struct TrainedState {
    // weights[output][input]
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    scaler: Scaler,
    metrics: ModelMetrics,
}

pub struct LinearModel {
    kind: ModelKind,
    input_dim: usize,
    output_dim: usize,
    activation: Activation,
    feature_names: &'static [&'static str],
    state: RwLock<Option<TrainedState>>,
}

const LEARNING_PATH_FEATURES: &[&str] = &[
    "current_week",
    "total_xp",
    "completed_lessons",
    "avg_score",
    "completion_rate",
    "total_attempts",
    "lab_pass_rate",
    "lab_count",
    "git_score",
    "linux_score",
    "docker_score",
    "k8s_score",
    "aws_score",
    "terraform_score",
    "jenkins_score",
    "monitoring_score",
    "git_attempts",
    "linux_attempts",
    "docker_attempts",
    "k8s_attempts",
    "aws_attempts",
];

const PERFORMANCE_FEATURES: &[&str] = &[
    "progress_count",
    "avg_score",
    "completion_rate",
    "struggle_time",
    "style_visual",
    "style_kinesthetic",
    "style_reading",
    "style_auditory",
];

const SKILL_GAP_FEATURES: &[&str] = &[
    "git_gap",
    "linux_gap",
    "docker_gap",
    "k8s_gap",
    "aws_gap",
    "terraform_gap",
    "jenkins_gap",
    "monitoring_gap",
];

impl LinearModel {
    /// Ranks the 15 path topics from 21 progress features
    pub fn learning_path() -> Self {
        Self::new(
            ModelKind::LearningPath,
            LEARNING_PATH_DIM,
            crate::features::PATH_TOPICS.len(),
            Activation::Sigmoid,
            LEARNING_PATH_FEATURES,
        )
    }

    /// Predicts completion probability from 8 performance features
    pub fn performance() -> Self {
        Self::new(
            ModelKind::Performance,
            PERFORMANCE_DIM,
            1,
            Activation::Clamp,
            PERFORMANCE_FEATURES,
        )
    }

    /// Predicts per-topic gap scores from 8 gap features
    pub fn skill_gap() -> Self {
        Self::new(
            ModelKind::SkillGap,
            SKILL_GAP_DIM,
            SKILL_GAP_DIM,
            Activation::Clamp,
            SKILL_GAP_FEATURES,
        )
    }

    fn new(
        kind: ModelKind,
        input_dim: usize,
        output_dim: usize,
        activation: Activation,
        feature_names: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            input_dim,
            output_dim,
            activation,
            feature_names,
            state: RwLock::new(None),
        }
    }

    fn forward(state: &TrainedState, scaled: &[f64]) -> Vec<f64> {
        state
            .weights
            .iter()
            .zip(&state.bias)
            .map(|(row, b)| b + row.iter().zip(scaled).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }
}

impl Model for LinearModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn is_trained(&self) -> bool {
        self.state.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictionError> {
        let guard = self.state.read().map_err(|_| PredictionError::Failed {
            model: self.kind.name(),
            reason: "state lock poisoned".to_string(),
        })?;
        let state = guard
            .as_ref()
            .ok_or(PredictionError::Untrained(self.kind.name()))?;

        let fitted = fit_dimension(features.to_vec(), self.input_dim);
        let scaled = state.scaler.transform(&fitted);
        let outputs: Vec<f64> = Self::forward(state, &scaled)
            .into_iter()
            .map(|v| self.activation.apply(v))
            .collect();

        if self.output_dim == 1 {
            Ok(Prediction::Scalar(outputs[0]))
        } else {
            Ok(Prediction::Vector(outputs))
        }
    }

    fn train(
        &self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> Result<TrainingReport, PredictionError> {
        if inputs.is_empty() || inputs.len() != targets.len() {
            return Err(PredictionError::InvalidTrainingData(format!(
                "{} inputs vs {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        if let Some(bad) = targets.iter().find(|t| t.len() != self.output_dim) {
            return Err(PredictionError::InvalidTrainingData(format!(
                "target width {} expected {}",
                bad.len(),
                self.output_dim
            )));
        }

        let rows: Vec<Vec<f64>> = inputs
            .iter()
            .map(|r| fit_dimension(r.clone(), self.input_dim))
            .collect();
        let scaler = Scaler::fit(&rows, self.input_dim);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();

        let n = scaled.len() as f64;
        let mut weights = vec![vec![0.0; self.input_dim]; self.output_dim];
        let mut bias = vec![0.0; self.output_dim];

        for _ in 0..EPOCHS {
            let mut weight_grad = vec![vec![0.0; self.input_dim]; self.output_dim];
            let mut bias_grad = vec![0.0; self.output_dim];

            for (x, y) in scaled.iter().zip(targets) {
                for j in 0..self.output_dim {
                    let pred: f64 =
                        bias[j] + weights[j].iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                    let err = y[j] - pred;
                    bias_grad[j] += err;
                    for (g, v) in weight_grad[j].iter_mut().zip(x) {
                        *g += err * v;
                    }
                }
            }

            for j in 0..self.output_dim {
                bias[j] += LEARNING_RATE * bias_grad[j] / n;
                for (w, g) in weights[j].iter_mut().zip(&weight_grad[j]) {
                    *w += LEARNING_RATE * g / n;
                }
            }
        }

        // Evaluate on the training set
        let mut sq_err = 0.0;
        let mut abs_err = 0.0;
        let count = (scaled.len() * self.output_dim) as f64;
        for (x, y) in scaled.iter().zip(targets) {
            for j in 0..self.output_dim {
                let pred = bias[j] + weights[j].iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                let err = y[j] - pred;
                sq_err += err * err;
                abs_err += err.abs();
            }
        }
        let loss = sq_err / count;
        let metrics = ModelMetrics {
            accuracy: (1.0 - abs_err / count).clamp(0.0, 1.0),
            loss,
            samples: inputs.len(),
        };
        let report = TrainingReport {
            model: self.kind.name(),
            samples: inputs.len(),
            loss,
            accuracy: metrics.accuracy,
        };

        let mut guard = self.state.write().map_err(|_| PredictionError::Failed {
            model: self.kind.name(),
            reason: "state lock poisoned".to_string(),
        })?;
        *guard = Some(TrainedState {
            weights,
            bias,
            scaler,
            metrics,
        });

        Ok(report)
    }

    fn feature_names(&self) -> &'static [&'static str] {
        self.feature_names
    }

    fn metrics(&self) -> ModelMetrics {
        self.state
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.metrics.clone()))
            .unwrap_or_default()
    }
}
