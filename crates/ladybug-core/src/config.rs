use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::bug::Severity;

/// Project-level configuration, read from `ladybug.toml` in the working
/// directory. Every section falls back to its defaults when the file or
/// key is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub bugs: BugsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugsConfig {
    /// Severity pre-selected in the new-bug dialog.
    #[serde(default = "default_severity")]
    pub default_severity: Severity,
}

impl Default for BugsConfig {
    fn default() -> Self {
        Self {
            default_severity: default_severity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rows shown on the top-performers card.
    #[serde(default = "default_top_performers")]
    pub top_performers: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_performers: default_top_performers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Weeks covered by the created-vs-resolved trend.
    #[serde(default = "default_trend_weeks")]
    pub trend_weeks: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trend_weeks: default_trend_weeks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Simulated export duration in milliseconds.
    #[serde(default = "default_export_delay_ms")]
    pub simulated_delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_export_delay_ms(),
        }
    }
}

/// Per-user configuration from the platform config directory
/// (`<config>/ladybug/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred output mode name ("pretty", "text", "json").
    #[serde(default)]
    pub output: Option<String>,
}

const fn default_severity() -> Severity {
    Severity::Medium
}

const fn default_top_performers() -> usize {
    5
}

const fn default_trend_weeks() -> usize {
    6
}

const fn default_export_delay_ms() -> u64 {
    1500
}

/// Load project config from `<root>/ladybug.toml`, defaulting when the
/// file does not exist.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join("ladybug.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config, defaulting when absent.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ladybug/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
