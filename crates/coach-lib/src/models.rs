//! Core data models for the learning coach service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed feature vector lengths, one per model
pub const LEARNING_PATH_DIM: usize = 21;
pub const PERFORMANCE_DIM: usize = 8;
pub const LEARNING_STYLE_DIM: usize = 8;
pub const SKILL_GAP_DIM: usize = 8;
pub const MOTIVATION_DIM: usize = 5;

/// Identifier for one of the five predictive models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    LearningPath,
    Performance,
    LearningStyle,
    SkillGap,
    Motivation,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::LearningPath,
        ModelKind::Performance,
        ModelKind::LearningStyle,
        ModelKind::SkillGap,
        ModelKind::Motivation,
    ];

    /// Wire name used in API paths and responses
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LearningPath => "learning-path-predictor",
            ModelKind::Performance => "performance-predictor",
            ModelKind::LearningStyle => "learning-style-detector",
            ModelKind::SkillGap => "skill-gap-analyzer",
            ModelKind::Motivation => "motivational-analyzer",
        }
    }

    pub fn parse(name: &str) -> Option<ModelKind> {
        ModelKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Expected input feature vector length
    pub fn input_dim(&self) -> usize {
        match self {
            ModelKind::LearningPath => LEARNING_PATH_DIM,
            ModelKind::Performance => PERFORMANCE_DIM,
            ModelKind::LearningStyle => LEARNING_STYLE_DIM,
            ModelKind::SkillGap => SKILL_GAP_DIM,
            ModelKind::Motivation => MOTIVATION_DIM,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lesson progress entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub week_id: i64,
    pub lesson_id: String,
    pub completed: bool,
    pub score: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A graded lab exercise submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSession {
    pub exercise_id: String,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

/// A structured self-reflection written after a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfterActionReview {
    pub lesson_id: String,
    pub level: String,
    pub completed_at: DateTime<Utc>,
    pub quality_score: f64,
    pub what_worked_well: Vec<String>,
    pub what_did_not_work: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub badge_type: String,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Aggregated per-user activity snapshot, read-only for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivityRecord {
    pub user_id: String,
    pub current_week: i64,
    pub total_xp: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub progress: Vec<ProgressRecord>,
    pub lab_sessions: Vec<LabSession>,
    pub reviews: Vec<AfterActionReview>,
    pub badges: Vec<Badge>,
    pub projects: Vec<ProjectRecord>,
}

/// Caller-supplied context, also the sole input on the fallback path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachContext {
    pub user_id: String,
    #[serde(default)]
    pub content_id: String,
    #[serde(default = "default_week")]
    pub current_week: i64,
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub time_spent: i64,
    #[serde(default)]
    pub hints_used: i64,
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub study_streak: i64,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub struggle_time: i64,
    #[serde(default)]
    pub topic_scores: HashMap<String, f64>,
    #[serde(default)]
    pub attempt_counts: HashMap<String, i64>,
    #[serde(default)]
    pub time_spent_per_topic: HashMap<String, i64>,
    #[serde(default)]
    pub error_patterns: HashMap<String, i64>,
}

fn default_week() -> i64 {
    1
}

/// Fixed-length feature vectors for the five models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub learning_path: Vec<f64>,
    pub performance: Vec<f64>,
    pub learning_style: Vec<f64>,
    pub skill_gap: Vec<f64>,
    pub motivation: Vec<f64>,
}

impl FeatureSet {
    /// Fail-safe default when no user data is available
    pub fn zeroed() -> Self {
        Self {
            learning_path: vec![0.0; LEARNING_PATH_DIM],
            performance: vec![0.0; PERFORMANCE_DIM],
            learning_style: vec![0.0; LEARNING_STYLE_DIM],
            skill_gap: vec![0.0; SKILL_GAP_DIM],
            motivation: vec![0.0; MOTIVATION_DIM],
        }
    }

    pub fn for_model(&self, kind: ModelKind) -> &[f64] {
        match kind {
            ModelKind::LearningPath => &self.learning_path,
            ModelKind::Performance => &self.performance,
            ModelKind::LearningStyle => &self.learning_style,
            ModelKind::SkillGap => &self.skill_gap,
            ModelKind::Motivation => &self.motivation,
        }
    }
}

/// Skill gap priority, high sorts before medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    pub topic: String,
    pub gap_score: f64,
    pub priority: GapPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotivationLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStyleInsight {
    pub primary_style: String,
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecommendation {
    pub topic: String,
    pub score: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalPath {
    pub recommended_topics: Vec<TopicRecommendation>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformancePrediction {
    pub completion_probability: f64,
    pub estimated_time_to_completion: i64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationalProfile {
    pub motivation_level: MotivationLevel,
    pub study_streak: i64,
    pub recommended_actions: Vec<String>,
}

/// Aggregate coaching insights, serialized verbatim by the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsPayload {
    #[serde(rename = "learningStyle")]
    pub learning_style: LearningStyleInsight,
    #[serde(rename = "skillGaps")]
    pub skill_gaps: Vec<SkillGap>,
    #[serde(rename = "optimalPath")]
    pub optimal_path: OptimalPath,
    #[serde(rename = "performancePrediction")]
    pub performance_prediction: PerformancePrediction,
    #[serde(rename = "motivationalProfile")]
    pub motivational_profile: MotivationalProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_feature_set_has_fixed_lengths() {
        let f = FeatureSet::zeroed();
        assert_eq!(f.learning_path.len(), LEARNING_PATH_DIM);
        assert_eq!(f.performance.len(), PERFORMANCE_DIM);
        assert_eq!(f.learning_style.len(), LEARNING_STYLE_DIM);
        assert_eq!(f.skill_gap.len(), SKILL_GAP_DIM);
        assert_eq!(f.motivation.len(), MOTIVATION_DIM);
        assert!(f.learning_path.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn model_kind_round_trips_through_wire_name() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(ModelKind::parse("unknown-model"), None);
    }

    #[test]
    fn gap_priority_orders_high_first() {
        assert!(GapPriority::High < GapPriority::Medium);
    }

    #[test]
    fn coach_context_accepts_partial_json() {
        let ctx: CoachContext = serde_json::from_str(r#"{"userId": "u-1"}"#).unwrap();
        assert_eq!(ctx.user_id, "u-1");
        assert_eq!(ctx.current_week, 1);
        assert!(ctx.topic_scores.is_empty());
    }

    #[test]
    fn insights_payload_uses_camel_case_sections() {
        let payload = InsightsPayload {
            learning_style: LearningStyleInsight {
                primary_style: "visual".to_string(),
                confidence: 0.6,
                recommendations: vec![],
            },
            skill_gaps: vec![],
            optimal_path: OptimalPath {
                recommended_topics: vec![],
                reasoning: String::new(),
            },
            performance_prediction: PerformancePrediction {
                completion_probability: 0.5,
                estimated_time_to_completion: 6,
                confidence: 0.75,
            },
            motivational_profile: MotivationalProfile {
                motivation_level: MotivationLevel::Medium,
                study_streak: 0,
                recommended_actions: vec![],
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("learningStyle").is_some());
        assert!(json.get("skillGaps").is_some());
        assert!(json.get("optimalPath").is_some());
        assert!(json.get("performancePrediction").is_some());
        assert!(json.get("motivationalProfile").is_some());
        assert_eq!(json["motivationalProfile"]["motivation_level"], "medium");
    }
}
