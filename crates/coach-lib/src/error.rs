//! Error types for the prediction and insight pipeline

use thiserror::Error;

/// Failure invoking a predictive model
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("model {0} is not trained")]
    Untrained(&'static str),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("prediction failed for {model}: {reason}")]
    Failed { model: &'static str, reason: String },
}

/// Failure producing the aggregate insights payload
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("insights generation failed: {0}")]
    Aggregation(String),
}
