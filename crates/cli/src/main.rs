//! Learning Coach CLI
//!
//! A command-line tool for generating coaching insights, inspecting the
//! predictive models, and checking the insight service status.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{insights, models, status};

/// Learning Coach CLI
#[derive(Parser)]
#[command(name = "coach")]
#[command(author, version, about = "CLI for the Learning Coach Insight Service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via COACH_API_URL env var)
    #[arg(long, env = "COACH_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate coaching insights for a user
    Insights {
        /// User identifier
        user_id: String,

        /// Current course week
        #[arg(long, default_value_t = 1)]
        week: i64,

        /// Performance score in [0, 1]
        #[arg(long, default_value_t = 0.5)]
        performance_score: f64,

        /// Consecutive study days
        #[arg(long, default_value_t = 0)]
        study_streak: i64,

        /// Hints used on the current content
        #[arg(long, default_value_t = 0)]
        hints_used: i64,
    },

    /// List models and their training state
    Models {
        /// Show only trained models
        #[arg(long)]
        trained_only: bool,
    },

    /// Run one model on raw feature values
    Predict {
        /// Model name, e.g. performance-predictor
        model: String,

        /// Comma-separated feature values
        #[arg(long, value_delimiter = ',')]
        features: Vec<f64>,
    },

    /// Show service info, health and readiness
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Insights {
            user_id,
            week,
            performance_score,
            study_streak,
            hints_used,
        } => {
            insights::show_insights(
                &client,
                &user_id,
                week,
                performance_score,
                study_streak,
                hints_used,
                cli.format,
            )
            .await?;
        }
        Commands::Models { trained_only } => {
            models::list_models(&client, trained_only, cli.format).await?;
        }
        Commands::Predict { model, features } => {
            models::predict(&client, &model, &features, cli.format).await?;
        }
        Commands::Status => {
            status::show_status(&client, cli.format).await?;
        }
    }

    Ok(())
}
