//! Configuration loading from drift.toml
//!
//! Runner behavior can be specified in a `drift.toml` file in the project
//! root. The configuration is discovered automatically by walking up from
//! the current directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Driftbench configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Batch runner behavior
    #[serde(default)]
    pub runner: RunnerSettings,
    /// Report output
    #[serde(default)]
    pub report: ReportSettings,
}

/// Batch runner behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Show a progress bar while a batch runs
    #[serde(default = "default_progress")]
    pub progress: bool,
    /// Pin the runner thread to this CPU before measuring
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            progress: default_progress(),
            pin_cpu: None,
        }
    }
}

fn default_progress() -> bool {
    true
}

/// Report output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl DriftConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("drift.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as a TOML string
    pub fn default_toml() -> String {
        r#"# Driftbench Configuration

[runner]
# Show a progress bar while a batch runs
progress = true
# Pin the runner thread to a CPU for steadier timings (uncomment to enable)
# pin_cpu = 0

[report]
# Default output format: human, json
format = "human"
"#
        .to_string()
    }
}
