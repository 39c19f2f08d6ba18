//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for service credentials, system settings, flow and plugin options.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::types::RestartPolicy;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub flows: FlowsConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl AppConfig {
    /// Loads the config at `path`. A missing file yields the defaults (console mode).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Configuration for connected services. No service means console mode.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub matrix: Option<MatrixConfig>,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Interval between two step ticks of the dispatch loop.
    #[serde(default = "default_step_interval")]
    pub step_interval_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            step_interval_ms: default_step_interval(),
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}

fn default_step_interval() -> u64 {
    100
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct FlowsConfig {
    #[serde(default)]
    pub on_restart: RestartPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PluginsConfig {
    /// Times a message must be said in a row before the bot joins in.
    #[serde(default = "default_repeat_threshold")]
    pub repeat_threshold: usize,
    /// Seconds between two checks for due reminders.
    #[serde(default = "default_reminder_check")]
    pub reminder_check_secs: u64,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            repeat_threshold: default_repeat_threshold(),
            reminder_check_secs: default_reminder_check(),
        }
    }
}

fn default_repeat_threshold() -> usize {
    2
}

fn default_reminder_check() -> u64 {
    10
}
