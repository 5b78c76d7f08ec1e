//! User activity data sources
//!
//! The pipeline consumes activity snapshots through the `DataSource`
//! capability trait. The variant is chosen from configuration at startup:
//! `mock` serves deterministic synthetic users, `disabled` serves nothing
//! and forces the context fallback path. A database-backed variant would
//! implement the same trait.

use crate::features::Topic;
use crate::models::{
    AfterActionReview, Badge, LabSession, ProgressRecord, ProjectRecord, UserActivityRecord,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the activity snapshot for a user, `None` when unknown
    async fn fetch_user_activity(&self, user_id: &str) -> Result<Option<UserActivityRecord>>;

    fn describe(&self) -> &'static str;
}

/// Select a data source variant by configured name
pub fn select(name: &str) -> Result<Arc<dyn DataSource>> {
    match name {
        "mock" => Ok(Arc::new(MockDataSource)),
        "disabled" => Ok(Arc::new(DisabledDataSource)),
        other => bail!("unknown data source: {}", other),
    }
}

/// Serves a deterministic synthetic snapshot per user id
pub struct MockDataSource;

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_user_activity(&self, user_id: &str) -> Result<Option<UserActivityRecord>> {
        Ok(Some(generate_user(user_id)))
    }

    fn describe(&self) -> &'static str {
        "mock"
    }
}

/// Never has data; every request takes the fallback path
pub struct DisabledDataSource;

#[async_trait]
impl DataSource for DisabledDataSource {
    async fn fetch_user_activity(&self, _user_id: &str) -> Result<Option<UserActivityRecord>> {
        Ok(None)
    }

    fn describe(&self) -> &'static str {
        "disabled"
    }
}

const BADGE_TYPES: [&str; 4] = ["linux-explorer", "git-master", "docker-expert", "k8s-specialist"];
const REVIEW_LEVELS: [&str; 3] = ["crawl", "walk-guided", "run-independent"];

fn seed_for(user_id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    user_id.hash(&mut hasher);
    hasher.finish()
}

/// Build a plausible activity snapshot, stable for a given user id
fn generate_user(user_id: &str) -> UserActivityRecord {
    let mut rng = SmallRng::seed_from_u64(seed_for(user_id));
    let now = Utc::now();

    let current_week = rng.gen_range(1..=12);
    let total_xp = rng.gen_range(0..5000);

    let mut progress = Vec::new();
    for week in 1..=current_week {
        // each week covers one topic of the rotation, five lessons
        let topic = Topic::ALL[(week - 1) as usize % Topic::ALL.len()];
        let slug = topic.insight_name().split('_').next().unwrap_or("intro");
        for lesson in 1..=5 {
            let completed = rng.gen::<f64>() < 0.8;
            progress.push(ProgressRecord {
                week_id: week,
                lesson_id: format!("week{}-{}-lesson{}", week, slug, lesson),
                completed,
                score: completed.then(|| rng.gen_range(70..=100) as f64),
                completed_at: completed.then(|| now - Duration::days(rng.gen_range(0..21))),
            });
        }
    }

    let lab_sessions = (0..rng.gen_range(5..=20))
        .map(|i| LabSession {
            exercise_id: format!("lab-{}", i + 1),
            passed: rng.gen::<f64>() < 0.7,
            submitted_at: now - Duration::days(rng.gen_range(0..14)),
        })
        .collect();

    let reviews = (0..rng.gen_range(2..=10))
        .map(|_| {
            let week = rng.gen_range(1..=current_week);
            AfterActionReview {
                lesson_id: format!("week{}-lesson{}", week, rng.gen_range(1..=5)),
                level: REVIEW_LEVELS[rng.gen_range(0..REVIEW_LEVELS.len())].to_string(),
                completed_at: now - Duration::days(rng.gen_range(0..28)),
                quality_score: 3.0 + rng.gen::<f64>() * 6.0,
                what_worked_well: vec!["Good examples".to_string()],
                what_did_not_work: vec!["Too fast pace".to_string()],
            }
        })
        .collect();

    let badge_count = rng.gen_range(0..=3);
    let badges = BADGE_TYPES
        .iter()
        .take(badge_count)
        .map(|badge_type| Badge {
            badge_type: badge_type.to_string(),
            earned_at: now - Duration::days(rng.gen_range(0..60)),
        })
        .collect();

    let projects = (0..rng.gen_range(0..=2))
        .map(|i| {
            let completed = rng.gen::<f64>() < 0.6;
            ProjectRecord {
                project_id: format!("project-{}", i + 1),
                completed,
                completed_at: completed.then(|| now - Duration::days(rng.gen_range(0..30))),
            }
        })
        .collect();

    UserActivityRecord {
        user_id: user_id.to_string(),
        current_week,
        total_xp,
        created_at: Some(now - Duration::weeks(current_week)),
        progress,
        lab_sessions,
        reviews,
        badges,
        projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_source_is_deterministic_per_user() {
        let source = MockDataSource;
        let a = source.fetch_user_activity("alice").await.unwrap().unwrap();
        let b = source.fetch_user_activity("alice").await.unwrap().unwrap();
        assert_eq!(a.current_week, b.current_week);
        assert_eq!(a.total_xp, b.total_xp);
        assert_eq!(a.progress.len(), b.progress.len());
        let lessons_a: Vec<_> = a.progress.iter().map(|p| p.lesson_id.clone()).collect();
        let lessons_b: Vec<_> = b.progress.iter().map(|p| p.lesson_id.clone()).collect();
        assert_eq!(lessons_a, lessons_b);
    }

    #[tokio::test]
    async fn different_users_get_different_snapshots() {
        let source = MockDataSource;
        let a = source.fetch_user_activity("alice").await.unwrap().unwrap();
        let b = source.fetch_user_activity("bob").await.unwrap().unwrap();
        // week and xp both colliding is vanishingly unlikely
        assert!(a.current_week != b.current_week || a.total_xp != b.total_xp);
    }

    #[tokio::test]
    async fn disabled_source_serves_nothing() {
        let source = DisabledDataSource;
        assert!(source.fetch_user_activity("alice").await.unwrap().is_none());
    }

    #[test]
    fn mock_lessons_carry_topic_markers() {
        let user = generate_user("carol");
        let attributed = user
            .progress
            .iter()
            .filter(|p| Topic::attribute(&p.lesson_id).is_some())
            .count();
        assert_eq!(attributed, user.progress.len());
    }

    #[test]
    fn selection_rejects_unknown_names() {
        assert!(select("mock").is_ok());
        assert!(select("disabled").is_ok());
        assert!(select("postgres").is_err());
    }
}
