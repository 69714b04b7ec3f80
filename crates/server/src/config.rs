//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path to the classifier artifact (.json or .onnx)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Expected SHA-256 of the artifact, hex encoded
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Probability cutoff used to flag label/probability disagreement
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,

    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/habitability.json")
}

fn default_api_port() -> u16 {
    8080
}

fn default_decision_threshold() -> f64 {
    0.5
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            model_sha256: None,
            api_port: default_api_port(),
            decision_threshold: default_decision_threshold(),
            instance_name: default_instance_name(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `HABITABILITY_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("HABITABILITY"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        let config: ServerConfig = config
            .try_deserialize()
            .context("Invalid server configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            anyhow::bail!(
                "decision_threshold must be within [0, 1], got {}",
                self.decision_threshold
            );
        }
        Ok(())
    }
}
