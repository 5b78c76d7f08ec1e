//! Coaching insights command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, InsightsPayload, InsightsRequest};
use crate::output::{
    color_confidence, color_priority, color_status, print_header, print_warning, OutputFormat,
};

/// Row for the skill gap table
#[derive(Tabled)]
struct SkillGapRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Gap")]
    gap: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

/// Row for the recommended topics table
#[derive(Tabled)]
struct TopicRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Fetch and render coaching insights for one user
pub async fn show_insights(
    client: &ApiClient,
    user_id: &str,
    week: i64,
    performance_score: f64,
    study_streak: i64,
    hints_used: i64,
    format: OutputFormat,
) -> Result<()> {
    let request = InsightsRequest {
        user_id: user_id.to_string(),
        current_week: week,
        performance_score,
        study_streak,
        hints_used,
    };

    let insights: InsightsPayload = client.post("coach/insights", &request).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&insights)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            print_header(&format!("Coaching insights for {}", user_id));

            let style = &insights.learning_style;
            println!(
                "Learning style: {} ({} confidence)",
                style.primary_style,
                color_confidence(style.confidence)
            );
            for recommendation in &style.recommendations {
                println!("  - {}", recommendation);
            }

            print_header("Skill gaps");
            if insights.skill_gaps.is_empty() {
                print_warning("No significant skill gaps detected");
            } else {
                let rows: Vec<SkillGapRow> = insights
                    .skill_gaps
                    .iter()
                    .map(|gap| SkillGapRow {
                        topic: gap.topic.clone(),
                        gap: format!("{:.2}", gap.gap_score),
                        priority: color_priority(&gap.priority),
                    })
                    .collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
            }

            print_header("Recommended path");
            let rows: Vec<TopicRow> = insights
                .optimal_path
                .recommended_topics
                .iter()
                .map(|topic| TopicRow {
                    topic: topic.topic.clone(),
                    score: format!("{:.2}", topic.score),
                    confidence: format!("{:.0}%", topic.confidence),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("{}", insights.optimal_path.reasoning);

            print_header("Performance");
            let prediction = &insights.performance_prediction;
            println!(
                "Completion probability: {} (confidence {})",
                color_confidence(prediction.completion_probability),
                color_confidence(prediction.confidence)
            );
            println!(
                "Estimated time to completion: {} weeks",
                prediction.estimated_time_to_completion
            );

            print_header("Motivation");
            let profile = &insights.motivational_profile;
            println!(
                "Level: {} (streak: {} days)",
                color_status(&profile.motivation_level),
                profile.study_streak
            );
            for action in &profile.recommended_actions {
                println!("  - {}", action);
            }
        }
    }

    Ok(())
}
