//! Output layer shared by every command handler.
//!
//! Each handler receives an [`OutputMode`] and formats accordingly: pretty
//! output for humans, compact text for pipes, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. hidden `--json` flag
//! 2. `LADYBUG_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. user config `output` preference
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use ladybug_core::error::{ExportError, FormError, StoreError};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized output (tables, sections, visual framing).
    Pretty,
    /// Plain text for pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[allow(dead_code)]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    json_flag: bool,
    format_env: Option<&str>,
    user_pref: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    for source in [format_env, user_pref] {
        if let Some(val) = source {
            match val.to_lowercase().as_str() {
                "json" => return OutputMode::Json,
                "text" => return OutputMode::Text,
                "pretty" => return OutputMode::Pretty,
                _ => {} // unknown value — fall through
            }
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from the `--json` flag, environment, user
/// config, and TTY defaults.
pub fn resolve_output_mode(json_flag: bool, user_pref: Option<&str>) -> OutputMode {
    let env_val = std::env::var("LADYBUG_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(json_flag, env_val.as_deref(), user_pref, is_tty)
}

/// Sentinel error for failures that were already rendered to stderr via
/// [`render_error`]; `main` exits non-zero without printing a second line.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("command failed")
    }
}

impl std::error::Error for Reported {}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2002").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }
}

impl From<&StoreError> for CliError {
    fn from(err: &StoreError) -> Self {
        let code = err.error_code();
        Self {
            message: err.to_string(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&FormError> for CliError {
    fn from(err: &FormError) -> Self {
        let code = err.error_code();
        Self {
            message: err.to_string(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&ExportError> for CliError {
    fn from(err: &ExportError) -> Self {
        let code = err.error_code();
        Self {
            message: err.to_string(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In pretty/text
/// mode, the provided `human_fn` closure produces the text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            human_fn(value, &mut out)?;
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render a success message to stdout.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "ok": true, "message": message });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "✓ {message}")?;
        }
    }
    Ok(())
}

/// Render a percentage bar for pretty summaries, e.g. `██████----  60%`.
pub fn percent_bar(percent: f64, width: usize) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}  {:>3.0}%",
        "█".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::{percent_bar, resolve_output_mode_inner, CliError, OutputMode};
    use ladybug_core::error::StoreError;

    #[test]
    fn json_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(true, Some("pretty"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_wins_over_user_pref() {
        let mode = resolve_output_mode_inner(false, Some("text"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn user_pref_wins_over_tty_default() {
        let mode = resolve_output_mode_inner(false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn unknown_values_fall_through_to_tty_detection() {
        let mode_tty = resolve_output_mode_inner(false, Some("fancy"), None, true);
        assert_eq!(mode_tty, OutputMode::Pretty);
        let mode_pipe = resolve_output_mode_inner(false, Some("fancy"), None, false);
        assert_eq!(mode_pipe, OutputMode::Text);
    }

    #[test]
    fn cli_error_from_store_error_carries_code() {
        let err = StoreError::NotFound {
            family: "bug",
            id: 7,
        };
        let cli = CliError::from(&err);
        assert!(cli.message.contains("bug 7"));
        assert_eq!(cli.error_code.as_deref(), Some("E2002"));
    }

    #[test]
    fn percent_bar_clamps() {
        assert_eq!(percent_bar(0.0, 4), "----    0%");
        assert_eq!(percent_bar(100.0, 4), "████  100%");
        assert_eq!(percent_bar(250.0, 4), "████  250%");
    }
}
