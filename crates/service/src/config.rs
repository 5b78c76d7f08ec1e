//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Insight service configuration, overridable via `COACH_`-prefixed
/// environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Data source variant: "mock" or "disabled"
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Synthetic sample count for startup training
    #[serde(default = "default_training_samples")]
    pub training_samples: usize,

    /// Seed for the synthetic training data generators
    #[serde(default = "default_training_seed")]
    pub training_seed: u64,
}

fn default_api_port() -> u16 {
    8000
}

fn default_data_source() -> String {
    "mock".to_string()
}

fn default_training_samples() -> usize {
    500
}

fn default_training_seed() -> u64 {
    42
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            data_source: default_data_source(),
            training_samples: default_training_samples(),
            training_seed: default_training_seed(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("COACH"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_expectations() {
        let config = ServiceConfig::default();
        assert_eq!(config.api_port, 8000);
        assert_eq!(config.data_source, "mock");
        assert_eq!(config.training_samples, 500);
        assert_eq!(config.training_seed, 42);
    }
}
