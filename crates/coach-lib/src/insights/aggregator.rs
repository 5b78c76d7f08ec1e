//! Merges the five model outputs into a single coaching insights payload
//!
//! Thresholds, tie-breaks and truncation rules live here. Learning style
//! and motivation level are derived from observed behavior (lab pass rate,
//! recent completions); the corresponding model probabilities are carried
//! for the prediction endpoints but do not override the behavior rules.

use crate::features::{lab_pass_rate, recent_completions, Topic, PATH_TOPICS, RECENT_WINDOW_DAYS};
use crate::models::{
    GapPriority, InsightsPayload, LearningStyleInsight, MotivationLevel, MotivationalProfile,
    OptimalPath, PerformancePrediction, SkillGap, TopicRecommendation, UserActivityRecord,
};
use crate::predictor::Prediction;
use chrono::{DateTime, Utc};

/// Gap scores at or below this are not worth surfacing
pub const GAP_INCLUDE_THRESHOLD: f64 = 0.3;
/// Gap scores above this are high priority
pub const GAP_HIGH_THRESHOLD: f64 = 0.7;
/// Payload carries at most this many skill gaps
pub const MAX_SKILL_GAPS: usize = 5;
/// Payload carries at most this many recommended topics
pub const MAX_PATH_TOPICS: usize = 5;
/// Lab pass rate strictly above this reads as hands-on learning
pub const HANDS_ON_PASS_RATE: f64 = 0.8;
/// Lab pass rate strictly above this reads as reading/writing learning
pub const READING_PASS_RATE: f64 = 0.6;
/// Fixed confidence reported with performance predictions
pub const PREDICTION_CONFIDENCE: f64 = 0.75;
/// Nominal course length used for time-to-completion estimates
pub const COURSE_LENGTH_WEEKS: f64 = 12.0;

/// Normalized outputs of the five models for one request
#[derive(Debug, Clone)]
pub struct ModelOutputs {
    pub learning_path: Prediction,
    pub performance: Prediction,
    pub learning_style: Prediction,
    pub skill_gap: Prediction,
    pub motivation: Prediction,
}

/// Deterministic merge of model outputs and activity-derived signals
pub struct InsightAggregator;

impl InsightAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        outputs: &ModelOutputs,
        user: &UserActivityRecord,
        now: DateTime<Utc>,
    ) -> InsightsPayload {
        InsightsPayload {
            learning_style: self.learning_style(user),
            skill_gaps: self.skill_gaps(&outputs.skill_gap),
            optimal_path: self.optimal_path(&outputs.learning_path),
            performance_prediction: self.performance_prediction(&outputs.performance),
            motivational_profile: self.motivational_profile(user, now),
        }
    }

    /// Map gap model outputs onto the fixed topic names, keep significant
    /// gaps, order by priority then severity, cap at five
    fn skill_gaps(&self, gap_output: &Prediction) -> Vec<SkillGap> {
        let scores = gap_output.as_slice();
        let mut gaps: Vec<SkillGap> = Topic::ALL
            .iter()
            .zip(scores)
            .filter(|(_, gap)| **gap > GAP_INCLUDE_THRESHOLD)
            .map(|(topic, gap)| SkillGap {
                topic: topic.insight_name().to_string(),
                gap_score: *gap,
                priority: if *gap > GAP_HIGH_THRESHOLD {
                    GapPriority::High
                } else {
                    GapPriority::Medium
                },
            })
            .collect();
        sort_gaps(&mut gaps);
        gaps.truncate(MAX_SKILL_GAPS);
        gaps
    }

    fn learning_style(&self, user: &UserActivityRecord) -> LearningStyleInsight {
        let pass_rate = lab_pass_rate(&user.lab_sessions);
        let (primary_style, confidence) = if user.lab_sessions.is_empty() {
            ("visual", 0.6)
        } else if pass_rate > HANDS_ON_PASS_RATE {
            ("hands_on", 0.8)
        } else if pass_rate > READING_PASS_RATE {
            ("reading_writing", 0.7)
        } else {
            ("visual", 0.6)
        };

        LearningStyleInsight {
            primary_style: primary_style.to_string(),
            confidence,
            recommendations: style_recommendations(primary_style),
        }
    }

    fn optimal_path(&self, path_output: &Prediction) -> OptimalPath {
        let scores = path_output.as_slice();
        let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let recommended_topics = ranked
            .into_iter()
            .take(MAX_PATH_TOPICS)
            .filter_map(|(idx, score)| {
                PATH_TOPICS.get(idx).map(|topic| TopicRecommendation {
                    topic: (*topic).to_string(),
                    score,
                    confidence: (score * 100.0).min(95.0),
                })
            })
            .collect();

        OptimalPath {
            recommended_topics,
            reasoning: "Based on your current progress and performance patterns".to_string(),
        }
    }

    fn performance_prediction(&self, performance_output: &Prediction) -> PerformancePrediction {
        let probability = performance_output.scalar().clamp(0.0, 1.0);
        PerformancePrediction {
            completion_probability: probability,
            estimated_time_to_completion: estimated_weeks(probability),
            confidence: PREDICTION_CONFIDENCE,
        }
    }

    fn motivational_profile(
        &self,
        user: &UserActivityRecord,
        now: DateTime<Utc>,
    ) -> MotivationalProfile {
        let recent = recent_completions(&user.progress, now, RECENT_WINDOW_DAYS);
        let level = motivation_level(recent);
        MotivationalProfile {
            motivation_level: level,
            study_streak: recent as i64,
            recommended_actions: motivation_actions(level),
        }
    }
}

impl Default for InsightAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// High priority first, then severity, then name for stable output
pub(crate) fn sort_gaps(gaps: &mut [SkillGap]) {
    gaps.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| {
                b.gap_score
                    .partial_cmp(&a.gap_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.topic.cmp(&b.topic))
    });
}

/// Weeks remaining, floor of one
pub(crate) fn estimated_weeks(probability: f64) -> i64 {
    (((1.0 - probability) * COURSE_LENGTH_WEEKS).round() as i64).max(1)
}

/// Recent completion count to motivation level: >3 high, >1 medium
pub(crate) fn motivation_level(recent_completions: usize) -> MotivationLevel {
    if recent_completions > 3 {
        MotivationLevel::High
    } else if recent_completions > 1 {
        MotivationLevel::Medium
    } else {
        MotivationLevel::Low
    }
}

pub(crate) fn style_recommendations(primary_style: &str) -> Vec<String> {
    let first = if primary_style == "hands_on" {
        "practice coding exercises"
    } else {
        "watch video tutorials"
    };
    vec![
        first.to_string(),
        "read documentation and guides".to_string(),
        "work through interactive labs".to_string(),
    ]
}

pub(crate) fn motivation_actions(level: MotivationLevel) -> Vec<String> {
    let actions: [&str; 3] = match level {
        MotivationLevel::Low => [
            "Set small daily goals to rebuild momentum",
            "Review previously completed material to regain confidence",
            "Connect with the community for support and motivation",
        ],
        MotivationLevel::Medium => [
            "Maintain consistent study schedule",
            "Focus on one topic at a time for deeper understanding",
            "Practice hands-on exercises regularly",
        ],
        MotivationLevel::High => [
            "Challenge yourself with advanced topics",
            "Contribute to open source projects",
            "Mentor other learners in the community",
        ],
    };
    actions.iter().map(|a| a.to_string()).collect()
}
