//! Derives fixed-length feature vectors from a user activity snapshot
//!
//! Every vector has a fixed length regardless of how much activity the
//! user has; a missing snapshot yields all-zero vectors. Divisions guard
//! against empty collections with a denominator floor of 1.

use super::topics::{Topic, TopicPerformance};
use super::{fit_dimension, lab_pass_rate, recent_completions};
use crate::models::{FeatureSet, UserActivityRecord, LEARNING_PATH_DIM, LEARNING_STYLE_DIM};
use chrono::{DateTime, Utc};

/// Trailing window for "recent" activity, in days
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Extracts per-model feature vectors from raw user activity
pub struct FeatureExtractor {
    recent_window_days: i64,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            recent_window_days: RECENT_WINDOW_DAYS,
        }
    }

    /// Extract all five feature vectors. `now` is the reference time for
    /// recency features; the extractor itself never reads the clock.
    pub fn extract(&self, activity: Option<&UserActivityRecord>, now: DateTime<Utc>) -> FeatureSet {
        let Some(user) = activity else {
            return FeatureSet::zeroed();
        };

        let topic_perf = TopicPerformance::from_progress(&user.progress);

        FeatureSet {
            learning_path: fit_dimension(
                self.learning_path_features(user, &topic_perf),
                LEARNING_PATH_DIM,
            ),
            performance: self.performance_features(user),
            learning_style: self.learning_style_features(user),
            skill_gap: self.skill_gap_features(&topic_perf),
            motivation: self.motivation_features(user, now),
        }
    }

    /// Overall pace, progress aggregates, lab performance, then per-topic
    /// best scores and attempt counts. The raw sequence runs past the
    /// declared vector length; the caller fits it to 21.
    fn learning_path_features(
        &self,
        user: &UserActivityRecord,
        topic_perf: &TopicPerformance,
    ) -> Vec<f64> {
        let mut features = Vec::with_capacity(24);

        features.push(user.current_week as f64);
        features.push(user.total_xp as f64 / 1000.0);

        let progress = &user.progress;
        let completed = progress.iter().filter(|p| p.completed).count();
        features.push(completed as f64 / 50.0);
        features.push(avg_score(user) / 100.0);
        features.push(completed as f64 / progress.len().max(1) as f64);
        features.push(progress.len() as f64 / 50.0);

        features.push(lab_pass_rate(&user.lab_sessions));
        features.push(user.lab_sessions.len() as f64 / 20.0);

        for topic in Topic::ALL {
            features.push(topic_perf.best_score(topic) / 100.0);
        }
        for topic in Topic::ALL {
            features.push((topic_perf.attempts(topic) as f64 / 10.0).min(1.0));
        }

        features
    }

    /// 8 features: progress aggregates, a struggle-time placeholder, then
    /// a style-weighted block chosen by lab pass rate
    fn performance_features(&self, user: &UserActivityRecord) -> Vec<f64> {
        let progress = &user.progress;
        let completed = progress.iter().filter(|p| p.completed).count();

        let mut features = vec![
            progress.len() as f64,
            avg_score(user) / 100.0,
            completed as f64 / progress.len().max(1) as f64,
            1.0,
        ];

        let pass_rate = lab_pass_rate(&user.lab_sessions);
        let style_block: [f64; 4] = if pass_rate > 0.8 {
            [0.2, 0.8, 0.6, 0.4]
        } else if pass_rate > 0.6 {
            [0.6, 0.4, 0.8, 0.2]
        } else {
            [0.8, 0.3, 0.4, 0.5]
        };
        features.extend_from_slice(&style_block);

        features
    }

    /// 8 features: neutral 0.5 baseline, with review engagement at index 0
    fn learning_style_features(&self, user: &UserActivityRecord) -> Vec<f64> {
        let mut features = vec![0.5; LEARNING_STYLE_DIM];
        if !user.reviews.is_empty() {
            features[0] = (user.reviews.len() as f64 / 10.0).min(1.0);
        }
        features
    }

    /// 8 features: gap = 1 - best score, in fixed topic order
    fn skill_gap_features(&self, topic_perf: &TopicPerformance) -> Vec<f64> {
        Topic::ALL
            .iter()
            .map(|topic| 1.0 - topic_perf.best_score(*topic) / 100.0)
            .collect()
    }

    /// 5 features: recent activity, achievements, projects, reflections, xp
    fn motivation_features(&self, user: &UserActivityRecord, now: DateTime<Utc>) -> Vec<f64> {
        let recent = recent_completions(&user.progress, now, self.recent_window_days);
        vec![
            recent as f64 / 7.0,
            user.badges.len() as f64 / 10.0,
            user.projects.len() as f64 / 3.0,
            user.reviews.len() as f64 / 20.0,
            user.total_xp as f64 / 5000.0,
        ]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean score over all progress records, missing scores counted as 0
fn avg_score(user: &UserActivityRecord) -> f64 {
    let total: f64 = user.progress.iter().filter_map(|p| p.score).sum();
    total / user.progress.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Badge, LabSession, ProgressRecord, ProjectRecord, LEARNING_PATH_DIM, LEARNING_STYLE_DIM,
        MOTIVATION_DIM, PERFORMANCE_DIM, SKILL_GAP_DIM,
    };
    use chrono::Duration;

    fn empty_user() -> UserActivityRecord {
        UserActivityRecord {
            user_id: "u-1".to_string(),
            current_week: 1,
            total_xp: 0,
            created_at: None,
            progress: vec![],
            lab_sessions: vec![],
            reviews: vec![],
            badges: vec![],
            projects: vec![],
        }
    }

    fn progress(lesson_id: &str, completed: bool, score: Option<f64>) -> ProgressRecord {
        ProgressRecord {
            week_id: 1,
            lesson_id: lesson_id.to_string(),
            completed,
            score,
            completed_at: completed.then(Utc::now),
        }
    }

    fn lab(passed: bool) -> LabSession {
        LabSession {
            exercise_id: "lab".to_string(),
            passed,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn missing_snapshot_yields_zero_vectors() {
        let features = FeatureExtractor::new().extract(None, Utc::now());
        assert_eq!(features, FeatureSet::zeroed());
    }

    #[test]
    fn vectors_have_fixed_lengths_for_any_input() {
        let mut user = empty_user();
        for i in 0..30 {
            user.progress
                .push(progress(&format!("week{}-git-l{}", i, i), true, Some(90.0)));
            user.lab_sessions.push(lab(i % 2 == 0));
        }
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(features.learning_path.len(), LEARNING_PATH_DIM);
        assert_eq!(features.performance.len(), PERFORMANCE_DIM);
        assert_eq!(features.learning_style.len(), LEARNING_STYLE_DIM);
        assert_eq!(features.skill_gap.len(), SKILL_GAP_DIM);
        assert_eq!(features.motivation.len(), MOTIVATION_DIM);
    }

    #[test]
    fn empty_collections_do_not_divide_by_zero() {
        let user = empty_user();
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert!(features.learning_path.iter().all(|v| v.is_finite()));
        assert!(features.performance.iter().all(|v| v.is_finite()));
        // completion rate and pass rate are 0 with no records
        assert_eq!(features.learning_path[4], 0.0);
        assert_eq!(features.learning_path[6], 0.0);
    }

    #[test]
    fn learning_path_basic_metrics() {
        let mut user = empty_user();
        user.current_week = 5;
        user.total_xp = 1200;
        user.progress = vec![
            progress("week1-git-intro", true, Some(80.0)),
            progress("week1-git-branch", true, Some(90.0)),
            progress("week2-linux-shell", false, None),
            progress("week2-linux-perms", true, Some(70.0)),
        ];

        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(features.learning_path[0], 5.0);
        assert_eq!(features.learning_path[1], 1.2);
        assert_eq!(features.learning_path[2], 3.0 / 50.0);
        assert_eq!(features.learning_path[3], 0.6); // (80+90+70)/4/100
        assert_eq!(features.learning_path[4], 0.75);
        assert_eq!(features.learning_path[5], 4.0 / 50.0);
    }

    #[test]
    fn topic_blocks_follow_fixed_order() {
        let mut user = empty_user();
        user.progress = vec![
            progress("week3-docker-intro", true, Some(88.0)),
            progress("Week2-GIT-intro", true, Some(75.0)),
        ];

        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        // Topic scores start at index 8: git, linux, docker, ...
        assert_eq!(features.learning_path[8], 0.75);
        assert_eq!(features.learning_path[9], 0.0);
        assert_eq!(features.learning_path[10], 0.88);
        // Attempts start at index 16
        assert_eq!(features.learning_path[16], 0.1);
        assert_eq!(features.learning_path[18], 0.1);
        // Skill gap mirrors topic scores
        assert_eq!(features.skill_gap[0], 0.25);
        assert!((features.skill_gap[2] - 0.12).abs() < 1e-9);
        assert_eq!(features.skill_gap[5], 1.0);
    }

    #[test]
    fn performance_style_block_switches_on_pass_rate() {
        let mut user = empty_user();
        user.lab_sessions = vec![lab(true), lab(true), lab(true), lab(true), lab(true)];
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(&features.performance[4..], &[0.2, 0.8, 0.6, 0.4]);

        user.lab_sessions = vec![lab(true), lab(true), lab(true), lab(false)];
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(&features.performance[4..], &[0.6, 0.4, 0.8, 0.2]);

        user.lab_sessions = vec![lab(true), lab(false)];
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(&features.performance[4..], &[0.8, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn exact_boundary_pass_rate_is_not_kinesthetic() {
        // 4 of 5 passed: rate is exactly 0.8, threshold is strict
        let mut user = empty_user();
        user.lab_sessions = vec![lab(true), lab(true), lab(true), lab(true), lab(false)];
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(&features.performance[4..], &[0.6, 0.4, 0.8, 0.2]);
    }

    #[test]
    fn learning_style_defaults_to_neutral() {
        let user = empty_user();
        let features = FeatureExtractor::new().extract(Some(&user), Utc::now());
        assert_eq!(features.learning_style, vec![0.5; LEARNING_STYLE_DIM]);
    }

    #[test]
    fn motivation_counts_recent_completions() {
        let now = Utc::now();
        let mut user = empty_user();
        user.total_xp = 2500;
        for days_ago in [1, 2, 3, 10] {
            let mut p = progress("week1-git-intro", true, Some(80.0));
            p.completed_at = Some(now - Duration::days(days_ago));
            user.progress.push(p);
        }
        user.badges = vec![Badge {
            badge_type: "git-master".to_string(),
            earned_at: now,
        }];
        user.projects = vec![ProjectRecord {
            project_id: "project-1".to_string(),
            completed: true,
            completed_at: Some(now),
        }];

        let features = FeatureExtractor::new().extract(Some(&user), now);
        assert_eq!(features.motivation[0], 3.0 / 7.0);
        assert_eq!(features.motivation[1], 0.1);
        assert!((features.motivation[2] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(features.motivation[4], 0.5);
    }
}
