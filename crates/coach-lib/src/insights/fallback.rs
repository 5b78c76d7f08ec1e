//! Context-only insight derivation
//!
//! Used when no persisted user activity is available or the models cannot
//! predict. Produces a payload of identical shape from the caller-supplied
//! coaching context alone; the models are never invoked on this path.

use super::aggregator::{sort_gaps, MAX_SKILL_GAPS};
use crate::models::{
    CoachContext, GapPriority, InsightsPayload, LearningStyleInsight, MotivationLevel,
    MotivationalProfile, OptimalPath, PerformancePrediction, SkillGap, TopicRecommendation,
};

/// Topic scores at or above this are considered solid on the fallback path
const SOLID_TOPIC_SCORE: f64 = 0.8;
/// Topic scores below this are flagged high priority
const WEAK_TOPIC_SCORE: f64 = 0.6;
/// Hint usage at or above this suggests a hands-on learner
const HANDS_ON_HINT_COUNT: i64 = 3;
/// Study streaks above this read as high motivation
const HIGH_MOTIVATION_STREAK: i64 = 5;

/// Derive a reduced-fidelity payload purely from the coaching context
pub fn from_context(ctx: &CoachContext) -> InsightsPayload {
    InsightsPayload {
        learning_style: learning_style(ctx),
        skill_gaps: skill_gaps(ctx),
        optimal_path: optimal_path(),
        performance_prediction: performance_prediction(ctx),
        motivational_profile: motivational_profile(ctx),
    }
}

fn learning_style(ctx: &CoachContext) -> LearningStyleInsight {
    let primary_style = if ctx.hints_used < HANDS_ON_HINT_COUNT {
        "visual"
    } else {
        "hands_on"
    };
    LearningStyleInsight {
        primary_style: primary_style.to_string(),
        confidence: 0.7,
        recommendations: vec![
            "practice coding exercises".to_string(),
            "watch video tutorials".to_string(),
        ],
    }
}

fn skill_gaps(ctx: &CoachContext) -> Vec<SkillGap> {
    let mut gaps: Vec<SkillGap> = ctx
        .topic_scores
        .iter()
        .filter(|(_, score)| **score < SOLID_TOPIC_SCORE)
        .map(|(topic, score)| SkillGap {
            topic: topic.clone(),
            gap_score: (1.0 - score).max(0.0),
            priority: if *score < WEAK_TOPIC_SCORE {
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

fn optimal_path() -> OptimalPath {
    OptimalPath {
        recommended_topics: vec![
            TopicRecommendation {
                topic: "docker_fundamentals".to_string(),
                score: 0.9,
                confidence: 85.0,
            },
            TopicRecommendation {
                topic: "kubernetes_basics".to_string(),
                score: 0.8,
                confidence: 80.0,
            },
        ],
        reasoning: "Based on current progress data".to_string(),
    }
}

fn performance_prediction(ctx: &CoachContext) -> PerformancePrediction {
    let probability = ctx.performance_score.clamp(0.0, 1.0);
    PerformancePrediction {
        completion_probability: probability,
        estimated_time_to_completion: (12 - ctx.current_week).max(1),
        confidence: 0.7,
    }
}

fn motivational_profile(ctx: &CoachContext) -> MotivationalProfile {
    let level = if ctx.study_streak > HIGH_MOTIVATION_STREAK {
        MotivationLevel::High
    } else {
        MotivationLevel::Medium
    };
    MotivationalProfile {
        motivation_level: level,
        study_streak: ctx.study_streak,
        recommended_actions: vec![
            "set daily goals".to_string(),
            "track progress".to_string(),
            "celebrate milestones".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context() -> CoachContext {
        CoachContext {
            user_id: "u-1".to_string(),
            content_id: "week5-docker".to_string(),
            current_week: 5,
            performance_score: 0.65,
            time_spent: 120,
            hints_used: 1,
            error_rate: 0.2,
            study_streak: 3,
            avg_score: 0.7,
            completion_rate: 0.8,
            struggle_time: 10,
            topic_scores: HashMap::new(),
            attempt_counts: HashMap::new(),
            time_spent_per_topic: HashMap::new(),
            error_patterns: HashMap::new(),
        }
    }

    #[test]
    fn low_hint_usage_reads_as_visual() {
        let payload = from_context(&context());
        assert_eq!(payload.learning_style.primary_style, "visual");

        let mut ctx = context();
        ctx.hints_used = 3;
        let payload = from_context(&ctx);
        assert_eq!(payload.learning_style.primary_style, "hands_on");
    }

    #[test]
    fn gaps_come_from_context_topic_scores() {
        let mut ctx = context();
        ctx.topic_scores = HashMap::from([
            ("git_basics".to_string(), 0.9),
            ("docker_fundamentals".to_string(), 0.5),
            ("linux_commands".to_string(), 0.7),
        ]);

        let payload = from_context(&ctx);
        let gaps = &payload.skill_gaps;
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].topic, "docker_fundamentals");
        assert_eq!(gaps[0].priority, GapPriority::High);
        assert!((gaps[0].gap_score - 0.5).abs() < 1e-9);
        assert_eq!(gaps[1].topic, "linux_commands");
        assert_eq!(gaps[1].priority, GapPriority::Medium);
    }

    #[test]
    fn gap_list_is_deterministic_and_capped() {
        let mut ctx = context();
        for i in 0..8 {
            ctx.topic_scores.insert(format!("topic_{}", i), 0.4);
        }
        let a = from_context(&ctx);
        let b = from_context(&ctx);
        assert_eq!(a.skill_gaps.len(), MAX_SKILL_GAPS);
        let names_a: Vec<_> = a.skill_gaps.iter().map(|g| g.topic.clone()).collect();
        let names_b: Vec<_> = b.skill_gaps.iter().map(|g| g.topic.clone()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn remaining_weeks_follow_current_week() {
        let payload = from_context(&context());
        assert_eq!(
            payload.performance_prediction.estimated_time_to_completion,
            7
        );
        assert_eq!(payload.performance_prediction.completion_probability, 0.65);

        let mut ctx = context();
        ctx.current_week = 12;
        let payload = from_context(&ctx);
        assert_eq!(
            payload.performance_prediction.estimated_time_to_completion,
            1
        );
    }

    #[test]
    fn streak_drives_motivation_level() {
        let payload = from_context(&context());
        assert_eq!(
            payload.motivational_profile.motivation_level,
            MotivationLevel::Medium
        );

        let mut ctx = context();
        ctx.study_streak = 6;
        let payload = from_context(&ctx);
        assert_eq!(
            payload.motivational_profile.motivation_level,
            MotivationLevel::High
        );
        assert_eq!(payload.motivational_profile.study_streak, 6);
    }
}
