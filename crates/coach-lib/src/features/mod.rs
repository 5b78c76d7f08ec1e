//! Feature extraction for the predictive models

mod extractor;
mod topics;

pub use extractor::{FeatureExtractor, RECENT_WINDOW_DAYS};
pub use topics::{Topic, TopicPerformance, PATH_TOPICS, TOPIC_COUNT};

use crate::models::{LabSession, ProgressRecord};
use chrono::{DateTime, Utc};

/// Fit a feature vector to a declared length: pad with zeros or truncate,
/// never an error
pub fn fit_dimension(mut values: Vec<f64>, dim: usize) -> Vec<f64> {
    values.resize(dim, 0.0);
    values
}

/// Share of lab sessions that passed; 0 when there are none
pub fn lab_pass_rate(labs: &[LabSession]) -> f64 {
    let passed = labs.iter().filter(|l| l.passed).count();
    passed as f64 / labs.len().max(1) as f64
}

/// Progress entries completed within the trailing window
pub fn recent_completions(
    progress: &[ProgressRecord],
    now: DateTime<Utc>,
    window_days: i64,
) -> usize {
    progress
        .iter()
        .filter(|p| {
            p.completed_at
                .map(|at| (now - at).num_days() < window_days)
                .unwrap_or(false)
        })
        .count()
}
