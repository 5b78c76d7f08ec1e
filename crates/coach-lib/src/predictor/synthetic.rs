//! Deterministic synthetic training data for startup model training
//!
//! Distributions mirror the learner behavior patterns the models are
//! expected to pick up: early weeks point at fundamentals, later weeks at
//! advanced topics, completion probability tracks scores and completion
//! rate, and class targets follow separable engagement signals.

use crate::features::PATH_TOPICS;
use crate::models::{
    ModelKind, LEARNING_PATH_DIM, LEARNING_STYLE_DIM, MOTIVATION_DIM, PERFORMANCE_DIM,
    SKILL_GAP_DIM,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Generate `(inputs, targets)` for one model family
pub fn training_data(kind: ModelKind, samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    match kind {
        ModelKind::LearningPath => learning_path(&mut rng, samples),
        ModelKind::Performance => performance(&mut rng, samples),
        ModelKind::LearningStyle => learning_style(&mut rng, samples),
        ModelKind::SkillGap => skill_gap(&mut rng, samples),
        ModelKind::Motivation => motivation(&mut rng, samples),
    }
}

/// Rough bell-shaped draw on [0, 1]
fn centered(rng: &mut SmallRng) -> f64 {
    (rng.gen::<f64>() + rng.gen::<f64>()) / 2.0
}

fn learning_path(rng: &mut SmallRng, samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);

    for _ in 0..samples {
        let week = rng.gen_range(1..=12) as f64;
        let avg_score = centered(rng);

        let mut x = Vec::with_capacity(LEARNING_PATH_DIM);
        x.push(week);
        x.push(rng.gen::<f64>() * 5.0); // xp in thousands
        x.push(rng.gen::<f64>()); // completed lessons
        x.push(avg_score);
        x.push(centered(rng)); // completion rate
        x.push(rng.gen::<f64>()); // attempts
        x.push(centered(rng)); // lab pass rate
        x.push(rng.gen::<f64>()); // lab count
        while x.len() < LEARNING_PATH_DIM {
            x.push(rng.gen::<f64>()); // topic scores and attempts
        }

        // Curriculum-position targets: basics first, containers and cloud
        // mid-course, advanced work for strong late-stage learners
        let mut y = vec![0.0; PATH_TOPICS.len()];
        if week <= 3.0 {
            y[0] = 0.9;
            y[1] = 0.8;
        } else if week <= 6.0 {
            y[2] = 0.9;
            y[3] = 0.8;
            y[4] = 0.7;
        } else if avg_score > 0.7 {
            y[8] = 0.9;
            y[9] = 0.8;
            y[10] = 0.7;
        } else {
            y[5] = 0.8;
            y[6] = 0.7;
        }

        inputs.push(x);
        targets.push(y);
    }

    (inputs, targets)
}

fn performance(rng: &mut SmallRng, samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    const STYLE_BLOCKS: [[f64; 4]; 3] = [
        [0.2, 0.8, 0.6, 0.4],
        [0.6, 0.4, 0.8, 0.2],
        [0.8, 0.3, 0.4, 0.5],
    ];

    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);

    for _ in 0..samples {
        let progress_count = rng.gen_range(0..50) as f64;
        let avg_score = centered(rng);
        let completion_rate = centered(rng);
        let style = STYLE_BLOCKS[rng.gen_range(0..STYLE_BLOCKS.len())];

        let mut x = Vec::with_capacity(PERFORMANCE_DIM);
        x.push(progress_count);
        x.push(avg_score);
        x.push(completion_rate);
        x.push(1.0);
        x.extend_from_slice(&style);

        let noise = (rng.gen::<f64>() - 0.5) * 0.1;
        let y = (0.45 * avg_score + 0.45 * completion_rate + 0.1 * (progress_count / 50.0) + noise)
            .clamp(0.0, 1.0);

        inputs.push(x);
        targets.push(vec![y]);
    }

    (inputs, targets)
}

fn learning_style(rng: &mut SmallRng, samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);

    for _ in 0..samples {
        let class = rng.gen_range(0..4);
        let mut x: Vec<f64> = (0..LEARNING_STYLE_DIM)
            .map(|_| rng.gen::<f64>() * 0.3)
            .collect();
        // indices 1..=4 carry the style signal
        x[1 + class] = 0.6 + rng.gen::<f64>() * 0.4;

        let mut y = vec![0.0; 4];
        y[class] = 1.0;

        inputs.push(x);
        targets.push(y);
    }

    (inputs, targets)
}

fn skill_gap(rng: &mut SmallRng, samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);

    for _ in 0..samples {
        let x: Vec<f64> = (0..SKILL_GAP_DIM).map(|_| rng.gen::<f64>()).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|gap| (gap + (rng.gen::<f64>() - 0.5) * 0.05).clamp(0.0, 1.0))
            .collect();

        inputs.push(x);
        targets.push(y);
    }

    (inputs, targets)
}

fn motivation(rng: &mut SmallRng, samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);

    for _ in 0..samples {
        let x: Vec<f64> = (0..MOTIVATION_DIM).map(|_| rng.gen::<f64>()).collect();
        let (recent, badges, projects, reviews, xp) = (x[0], x[1], x[2], x[3], x[4]);

        let class = if recent > 0.5 && (badges > 0.5 || xp > 0.6) {
            0 // achievement: active and collecting
        } else if reviews > 0.5 {
            1 // mastery: heavy reflection
        } else if projects > 0.5 {
            2 // social: project-driven
        } else {
            3 // autonomy
        };

        let mut y = vec![0.0; 4];
        y[class] = 1.0;

        inputs.push(x);
        targets.push(y);
    }

    (inputs, targets)
}
