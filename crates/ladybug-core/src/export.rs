//! Simulated data export.
//!
//! The export runs as a single cancellable task: `Idle -> Running ->
//! {Succeeded, Failed, Cancelled}`. The artifact is rendered eagerly on
//! `start`; `tick` surfaces the outcome once the configured simulated delay
//! has elapsed, keeping the whole model single-threaded and deterministic.
//! Starting a second export while one is running is rejected rather than
//! racing.
//!
//! CSV and JSON produce real bytes. Excel and PDF are not implemented and
//! fail with a defined error instead of pretending.

use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

use crate::derive;
use crate::error::ExportError;
use crate::model::bug::{Bug, ParseEnumError};
use crate::report;
use crate::state::AppState;

/// A selectable data category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Bugs,
    Teams,
    Rewards,
    Statistics,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::Bugs, Self::Teams, Self::Rewards, Self::Statistics];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Bugs => "bugs",
            Self::Teams => "teams",
            Self::Rewards => "rewards",
            Self::Statistics => "statistics",
        }
    }

    /// Human display label for the selection checklist.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bugs => "Bugs and Issues",
            Self::Teams => "Teams and Members",
            Self::Rewards => "Bounties and Rewards",
            Self::Statistics => "Performance Statistics",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bugs" => Ok(Self::Bugs),
            "teams" => Ok(Self::Teams),
            "rewards" => Ok(Self::Rewards),
            "statistics" | "stats" => Ok(Self::Statistics),
            _ => Err(ParseEnumError {
                expected: "section",
                got: s.to_string(),
            }),
        }
    }
}

/// Output format for the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Excel,
    Pdf,
}

impl Format {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "excel",
            Self::Pdf => "pdf",
        }
    }

    /// File extension for the artifact name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "excel" | "xlsx" => Ok(Self::Excel),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ParseEnumError {
                expected: "format",
                got: s.to_string(),
            }),
        }
    }
}

/// What to export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub sections: BTreeSet<Section>,
    /// Inclusive creation-date range applied to bugs; `None` bounds are
    /// open.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub format: Format,
    pub file_stem: String,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            sections: Section::ALL.into_iter().collect(),
            from: None,
            to: None,
            format: Format::Csv,
            file_stem: "bug-bounty-export".into(),
        }
    }
}

impl ExportRequest {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.format.extension())
    }
}

/// A rendered export artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Observable status of the export task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    Running,
    Succeeded { file_name: String, bytes: u64 },
    Failed { reason: String },
    Cancelled,
}

impl ExportStatus {
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// The tick-driven export task.
#[derive(Debug)]
pub struct ExportTask {
    status: ExportStatus,
    delay: Duration,
    pending: Option<(Instant, Result<Artifact, String>)>,
    finished: Option<Artifact>,
}

impl ExportTask {
    /// `delay` is the simulated duration between `start` and the terminal
    /// state surfacing via `tick`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            status: ExportStatus::Idle,
            delay,
            pending: None,
            finished: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &ExportStatus {
        &self.status
    }

    /// Begin an export. The artifact is rendered up front; the outcome is
    /// held back until the simulated delay elapses.
    pub fn start(&mut self, request: &ExportRequest, state: &AppState) -> Result<(), ExportError> {
        if self.status.is_running() {
            return Err(ExportError::AlreadyRunning);
        }
        info!(format = %request.format, file = %request.file_name(), "export started");
        let outcome = render(request, state).map_err(|e| e.to_string());
        self.pending = Some((Instant::now(), outcome));
        self.finished = None;
        self.status = ExportStatus::Running;
        Ok(())
    }

    /// Advance the simulated run. Call periodically; transitions
    /// `Running -> Succeeded | Failed` once the delay has elapsed.
    pub fn tick(&mut self) {
        if !self.status.is_running() {
            return;
        }
        let Some((started, _)) = &self.pending else {
            return;
        };
        if started.elapsed() < self.delay {
            return;
        }
        let Some((_, outcome)) = self.pending.take() else {
            return;
        };
        match outcome {
            Ok(artifact) => {
                info!(file = %artifact.file_name, bytes = artifact.bytes.len(), "export finished");
                self.status = ExportStatus::Succeeded {
                    file_name: artifact.file_name.clone(),
                    bytes: artifact.bytes.len() as u64,
                };
                self.finished = Some(artifact);
            }
            Err(reason) => {
                info!(%reason, "export failed");
                self.status = ExportStatus::Failed { reason };
            }
        }
    }

    /// Cancel a running export. Only `Running` transitions to `Cancelled`;
    /// terminal and idle states are unaffected.
    pub fn cancel(&mut self) {
        if self.status.is_running() {
            info!("export cancelled");
            self.pending = None;
            self.status = ExportStatus::Cancelled;
        }
    }

    /// Take the artifact of a succeeded run.
    pub fn take_artifact(&mut self) -> Option<Artifact> {
        self.finished.take()
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

fn in_range(bug: &Bug, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let date = bug.created_at.date_naive();
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

/// Render the artifact for a request against the current state.
pub fn render(request: &ExportRequest, state: &AppState) -> Result<Artifact, ExportError> {
    if request.sections.is_empty() {
        return Err(ExportError::NothingSelected);
    }
    let bugs: Vec<Bug> = state
        .bugs
        .iter()
        .filter(|b| in_range(b, request.from, request.to))
        .cloned()
        .collect();

    let bytes = match request.format {
        Format::Csv => render_csv(request, state, &bugs),
        Format::Json => render_json(request, state, &bugs)?,
        Format::Excel => return Err(ExportError::UnsupportedFormat("excel")),
        Format::Pdf => return Err(ExportError::UnsupportedFormat("pdf")),
    };

    Ok(Artifact {
        file_name: request.file_name(),
        bytes,
    })
}

/// Quote a CSV field per RFC 4180 when it contains a delimiter, quote, or
/// newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    quoted.join(",")
}

fn render_csv(request: &ExportRequest, state: &AppState, bugs: &[Bug]) -> Vec<u8> {
    let mut out = String::new();

    for (i, section) in request.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("# {section}\n"));
        match section {
            Section::Bugs => {
                out.push_str("id,title,status,severity,bucket,assignee,reported_by,created_at,updated_at\n");
                for bug in bugs {
                    let row = csv_row(&[
                        bug.id.to_string(),
                        bug.title.clone(),
                        bug.status.to_string(),
                        bug.severity.to_string(),
                        state.bucket_name(bug.bucket).unwrap_or("unknown").to_string(),
                        state.assignee_label(bug.assignee).to_string(),
                        bug.reported_by.clone(),
                        bug.created_at.to_rfc3339(),
                        bug.updated_at.to_rfc3339(),
                    ]);
                    out.push_str(&row);
                    out.push('\n');
                }
            }
            Section::Teams => {
                out.push_str("team,member,designation\n");
                for team in &state.teams {
                    for member in &team.members {
                        let row = csv_row(&[
                            team.name.clone(),
                            member.name.clone(),
                            member.designation.clone(),
                        ]);
                        out.push_str(&row);
                        out.push('\n');
                    }
                }
            }
            Section::Rewards => {
                out.push_str("member,month,amount\n");
                for entry in &state.rewards {
                    let row = csv_row(&[
                        entry.member.clone(),
                        entry.month.clone(),
                        entry.amount.to_string(),
                    ]);
                    out.push_str(&row);
                    out.push('\n');
                }
            }
            Section::Statistics => {
                let stats = report::summary(bugs);
                out.push_str("total_bugs,resolution_rate,avg_resolution_days,open_critical\n");
                out.push_str(&format!(
                    "{},{:.1},{:.1},{}\n",
                    stats.total_bugs,
                    stats.resolution_rate,
                    stats.avg_resolution_days,
                    stats.open_critical
                ));
            }
        }
    }

    out.into_bytes()
}

fn render_json(
    request: &ExportRequest,
    state: &AppState,
    bugs: &[Bug],
) -> Result<Vec<u8>, ExportError> {
    let mut root = serde_json::Map::new();
    for section in &request.sections {
        let value = match section {
            Section::Bugs => serde_json::to_value(bugs),
            Section::Teams => serde_json::to_value(state.teams.as_slice()),
            Section::Rewards => serde_json::to_value(&state.rewards),
            Section::Statistics => {
                let by_status: serde_json::Map<String, serde_json::Value> =
                    derive::status_counts(bugs)
                        .iter()
                        .map(|(s, n)| (s.to_string(), serde_json::Value::from(*n)))
                        .collect();
                Ok(json!({
                    "summary": report::summary(bugs),
                    "by_status": by_status,
                }))
            }
        }
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        root.insert(section.to_string(), value);
    }

    let mut bytes = serde_json::to_vec_pretty(&serde_json::Value::Object(root))
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::{render, ExportRequest, ExportStatus, ExportTask, Format, Section};
    use crate::error::ExportError;
    use crate::seed;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn csv_request() -> ExportRequest {
        ExportRequest::default()
    }

    #[test]
    fn task_starts_idle_and_runs_to_success() {
        let state = seed::sample();
        let mut task = ExportTask::new(Duration::ZERO);
        assert_eq!(*task.status(), ExportStatus::Idle);

        task.start(&csv_request(), &state).unwrap();
        assert!(task.status().is_running());

        task.tick();
        match task.status() {
            ExportStatus::Succeeded { file_name, bytes } => {
                assert_eq!(file_name, "bug-bounty-export.csv");
                assert!(*bytes > 0);
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert!(task.take_artifact().is_some());
    }

    #[test]
    fn second_start_while_running_is_rejected() {
        let state = seed::sample();
        let mut task = ExportTask::new(Duration::from_secs(60));
        task.start(&csv_request(), &state).unwrap();
        assert!(matches!(
            task.start(&csv_request(), &state),
            Err(ExportError::AlreadyRunning)
        ));
    }

    #[test]
    fn cancel_only_affects_running() {
        let state = seed::sample();
        let mut task = ExportTask::new(Duration::from_secs(60));

        task.cancel();
        assert_eq!(*task.status(), ExportStatus::Idle);

        task.start(&csv_request(), &state).unwrap();
        task.cancel();
        assert_eq!(*task.status(), ExportStatus::Cancelled);

        // A cancelled task can start again.
        task.start(&csv_request(), &state).unwrap();
        assert!(task.status().is_running());
    }

    #[test]
    fn unsupported_format_surfaces_as_failed_after_delay() {
        let state = seed::sample();
        let mut task = ExportTask::new(Duration::ZERO);
        let request = ExportRequest {
            format: Format::Pdf,
            ..ExportRequest::default()
        };
        task.start(&request, &state).unwrap();
        task.tick();
        assert!(matches!(task.status(), ExportStatus::Failed { .. }));
    }

    #[test]
    fn csv_artifact_contains_selected_sections() {
        let state = seed::sample();
        let request = ExportRequest {
            sections: [Section::Bugs, Section::Statistics].into_iter().collect(),
            ..ExportRequest::default()
        };
        let artifact = render(&request, &state).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("# bugs"));
        assert!(text.contains("# statistics"));
        assert!(!text.contains("# teams"));
        assert!(text.contains("Login Authentication Bypass"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        assert_eq!(super::csv_field("plain"), "plain");
        assert_eq!(super::csv_field("a,b"), "\"a,b\"");
        assert_eq!(super::csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_artifact_is_valid_and_filtered_by_date() {
        let state = seed::sample();
        let request = ExportRequest {
            sections: [Section::Bugs].into_iter().collect(),
            format: Format::Json,
            from: chrono::NaiveDate::from_ymd_opt(2023, 4, 10),
            to: None,
            ..ExportRequest::default()
        };
        let artifact = render(&request, &state).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        let bugs = value["bugs"].as_array().unwrap();
        assert!(!bugs.is_empty());
        // All seed bugs created before 2023-04-10 are filtered out.
        assert!(bugs.len() < state.bugs.len());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let state = seed::sample();
        let request = ExportRequest {
            sections: BTreeSet::new(),
            ..ExportRequest::default()
        };
        assert!(matches!(
            render(&request, &state),
            Err(ExportError::NothingSelected)
        ));
    }
}
