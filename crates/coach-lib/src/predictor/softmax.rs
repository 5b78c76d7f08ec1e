//! Multi-class softmax classifiers trained with cross-entropy descent

use super::{Model, ModelMetrics, Prediction, Scaler, TrainingReport};
use crate::error::PredictionError;
use crate::features::fit_dimension;
use crate::models::{ModelKind, LEARNING_STYLE_DIM, MOTIVATION_DIM};
use std::sync::RwLock;

const LEARNING_RATE: f64 = 0.05;
const EPOCHS: usize = 500;

struct TrainedState {
    // weights[class][input]
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    scaler: Scaler,
    metrics: ModelMetrics,
}

/// Softmax classifier over a fixed set of named classes
pub struct SoftmaxModel {
    kind: ModelKind,
    input_dim: usize,
    class_names: &'static [&'static str],
    feature_names: &'static [&'static str],
    state: RwLock<Option<TrainedState>>,
}

const LEARNING_STYLE_FEATURES: &[&str] = &[
    "review_engagement",
    "visual_signal",
    "kinesthetic_signal",
    "reading_signal",
    "auditory_signal",
    "pace_signal",
    "depth_signal",
    "variety_signal",
];

const MOTIVATION_FEATURES: &[&str] = &[
    "recent_activity",
    "achievement_score",
    "project_completion",
    "reflection_score",
    "xp_progress",
];

pub const LEARNING_STYLES: &[&str] = &["visual", "kinesthetic", "reading", "auditory"];
pub const MOTIVATION_TYPES: &[&str] = &["achievement", "mastery", "social", "autonomy"];

impl SoftmaxModel {
    /// Classifies preferred learning style from 8 behavior features
    pub fn learning_style() -> Self {
        Self::new(
            ModelKind::LearningStyle,
            LEARNING_STYLE_DIM,
            LEARNING_STYLES,
            LEARNING_STYLE_FEATURES,
        )
    }

    /// Classifies primary motivation type from 5 engagement features
    pub fn motivation() -> Self {
        Self::new(
            ModelKind::Motivation,
            MOTIVATION_DIM,
            MOTIVATION_TYPES,
            MOTIVATION_FEATURES,
        )
    }

    fn new(
        kind: ModelKind,
        input_dim: usize,
        class_names: &'static [&'static str],
        feature_names: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            input_dim,
            class_names,
            feature_names,
            state: RwLock::new(None),
        }
    }

    pub fn class_names(&self) -> &'static [&'static str] {
        self.class_names
    }

    fn probabilities(state: &TrainedState, scaled: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = state
            .weights
            .iter()
            .zip(&state.bias)
            .map(|(row, b)| b + row.iter().zip(scaled).map(|(w, x)| w * x).sum::<f64>())
            .collect();
        softmax(&logits)
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

impl Model for SoftmaxModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.class_names.len()
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
        Ok(Prediction::Vector(Self::probabilities(state, &scaled)))
    }

    fn train(
        &self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> Result<TrainingReport, PredictionError> {
        let classes = self.class_names.len();
        if inputs.is_empty() || inputs.len() != targets.len() {
            return Err(PredictionError::InvalidTrainingData(format!(
                "{} inputs vs {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        if let Some(bad) = targets.iter().find(|t| t.len() != classes) {
            return Err(PredictionError::InvalidTrainingData(format!(
                "target width {} expected {}",
                bad.len(),
                classes
            )));
        }

        let rows: Vec<Vec<f64>> = inputs
            .iter()
            .map(|r| fit_dimension(r.clone(), self.input_dim))
            .collect();
        let scaler = Scaler::fit(&rows, self.input_dim);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();

        let n = scaled.len() as f64;
        let mut weights = vec![vec![0.0; self.input_dim]; classes];
        let mut bias = vec![0.0; classes];

        for _ in 0..EPOCHS {
            let mut weight_grad = vec![vec![0.0; self.input_dim]; classes];
            let mut bias_grad = vec![0.0; classes];

            for (x, y) in scaled.iter().zip(targets) {
                let logits: Vec<f64> = weights
                    .iter()
                    .zip(&bias)
                    .map(|(row, b)| b + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
                    .collect();
                let probs = softmax(&logits);

                for c in 0..classes {
                    let err = probs[c] - y[c];
                    bias_grad[c] += err;
                    for (g, v) in weight_grad[c].iter_mut().zip(x) {
                        *g += err * v;
                    }
                }
            }

            for c in 0..classes {
                bias[c] -= LEARNING_RATE * bias_grad[c] / n;
                for (w, g) in weights[c].iter_mut().zip(&weight_grad[c]) {
                    *w -= LEARNING_RATE * g / n;
                }
            }
        }

        // Evaluate on the training set
        let state = TrainedState {
            weights,
            bias,
            scaler,
            metrics: ModelMetrics::default(),
        };
        let mut loss = 0.0;
        let mut correct = 0usize;
        for (x, y) in scaled.iter().zip(targets) {
            let probs = Self::probabilities(&state, x);
            let label = argmax(y);
            loss -= probs[label].max(1e-12).ln();
            if argmax(&probs) == label {
                correct += 1;
            }
        }
        loss /= n;
        let metrics = ModelMetrics {
            accuracy: correct as f64 / n,
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
        *guard = Some(TrainedState { metrics, ..state });

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        let model = SoftmaxModel::learning_style();
        let inputs: Vec<Vec<f64>> = (0..80)
            .map(|i| {
                let c = i % 4;
                let mut row = vec![0.1; 8];
                row[1 + c] = 0.9;
                row
            })
            .collect();
        let targets: Vec<Vec<f64>> = (0..80)
            .map(|i| {
                let mut y = vec![0.0; 4];
                y[i % 4] = 1.0;
                y
            })
            .collect();
        model.train(&inputs, &targets).unwrap();

        let probs = model.predict(&vec![0.5; 8]).unwrap().into_vector();
        assert_eq!(probs.len(), 4);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn separable_classes_are_learned() {
        let model = SoftmaxModel::motivation();
        let inputs: Vec<Vec<f64>> = (0..100)
            .map(|i| {
                let c = i % 4;
                let mut row = vec![0.1; 5];
                if c < 4 {
                    row[c.min(4)] = 0.9;
                }
                row
            })
            .collect();
        let targets: Vec<Vec<f64>> = (0..100)
            .map(|i| {
                let mut y = vec![0.0; 4];
                y[i % 4] = 1.0;
                y
            })
            .collect();

        let report = model.train(&inputs, &targets).unwrap();
        assert!(report.accuracy > 0.9, "accuracy was {}", report.accuracy);

        // A strong class-0 signal should win class 0
        let probs = model
            .predict(&[0.9, 0.1, 0.1, 0.1, 0.1])
            .unwrap()
            .into_vector();
        assert_eq!(argmax(&probs), 0);
    }

    #[test]
    fn untrained_classifier_is_refused() {
        let model = SoftmaxModel::motivation();
        assert!(matches!(
            model.predict(&[0.0; 5]),
            Err(PredictionError::Untrained("motivational-analyzer"))
        ));
    }
}
