//! Model listing and ad-hoc prediction commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, ModelList, PredictRequest, PredictResponse};
use crate::output::{color_confidence, print_success, print_warning, OutputFormat};

/// Row for the models table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    model_type: String,
    #[tabled(rename = "Trained")]
    trained: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Samples")]
    samples: String,
}

/// List models and their training state
pub async fn list_models(client: &ApiClient, trained_only: bool, format: OutputFormat) -> Result<()> {
    let result: ModelList = client.get("models").await?;

    let filtered: Vec<_> = if trained_only {
        result.models.into_iter().filter(|m| m.trained).collect()
    } else {
        result.models
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&filtered)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if filtered.is_empty() {
                print_warning("No models found");
                return Ok(());
            }

            let rows: Vec<ModelRow> = filtered
                .iter()
                .map(|m| ModelRow {
                    name: m.name.clone(),
                    model_type: m.model_type.clone(),
                    trained: if m.trained {
                        "✓".to_string()
                    } else {
                        "".to_string()
                    },
                    accuracy: format!("{:.1}%", m.metrics.accuracy * 100.0),
                    samples: m.metrics.samples.to_string(),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

/// Run one model on raw feature values
pub async fn predict(
    client: &ApiClient,
    model: &str,
    features: &[f64],
    format: OutputFormat,
) -> Result<()> {
    let request = PredictRequest {
        features: features.to_vec(),
    };
    let path = format!("predict/{}", model);

    let response: PredictResponse = client.post(&path, &request).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            print_success(&format!("Prediction from {}", model));
            let values: Vec<String> = response
                .prediction
                .iter()
                .map(|v| format!("{:.4}", v))
                .collect();
            println!("Output: [{}]", values.join(", "));
            println!("Confidence: {}", color_confidence(response.confidence));
            println!("{}", response.explanation);
        }
    }

    Ok(())
}
