//! Service status command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, HealthResponse, ReadinessResponse, ServiceInfo};
use crate::output::{color_status, format_timestamp, print_header, OutputFormat};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Check")]
    last_check: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Show service info, health and readiness
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ServiceInfo = client.get("").await?;
    let health: HealthResponse = client.get("healthz").await?;
    let readiness: ReadinessResponse = client.get("readyz").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "info": info,
                "health": health,
                "readiness": readiness,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            println!("{} - {}", info.message, color_status(&info.status));
            println!("Models loaded: {}", info.models_loaded.join(", "));
            println!(
                "Ready: {}{}",
                readiness.ready,
                readiness
                    .reason
                    .map(|r| format!(" ({})", r))
                    .unwrap_or_default()
            );

            print_header("Components");
            let mut rows: Vec<ComponentRow> = health
                .components
                .iter()
                .map(|(name, component)| ComponentRow {
                    component: name.clone(),
                    status: color_status(&component.status),
                    last_check: format_timestamp(component.last_check_timestamp),
                    message: component.message.clone().unwrap_or_default(),
                })
                .collect();
            rows.sort_by(|a, b| a.component.cmp(&b.component));

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("Overall: {}", color_status(&health.status));
        }
    }

    Ok(())
}
