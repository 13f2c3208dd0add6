//! `lb export` — render an export artifact to disk.
//!
//! The CLI path serializes synchronously; the simulated-delay task only
//! exists for the interactive Export page.

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use ladybug_core::export::{self, ExportRequest, Format, Section};
use ladybug_core::state::AppState;

use crate::output::{render, render_error, CliError, OutputMode, Reported};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format (csv, json, excel, pdf).
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Data sections to include (comma-separated: bugs,teams,rewards,statistics).
    #[arg(long, default_value = "bugs,teams,rewards,statistics")]
    pub sections: String,

    /// Inclusive start of the creation-date range (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end of the creation-date range (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    /// Output directory (defaults to the current directory).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Artifact file name without extension.
    #[arg(long, default_value = "bug-bounty-export")]
    pub stem: String,
}

#[derive(Debug, Serialize)]
struct ExportPayload {
    file: String,
    bytes: usize,
    sections: Vec<String>,
}

fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::from_str(raw)
        .map_err(|_| CliError::new(format!("invalid {label} date: '{raw}' (want YYYY-MM-DD)")))
}

fn parse_request(args: &ExportArgs) -> Result<ExportRequest, CliError> {
    let format = Format::from_str(&args.format).map_err(|e| CliError::new(e.to_string()))?;

    let mut sections = BTreeSet::new();
    for raw in args.sections.split(',').filter(|s| !s.trim().is_empty()) {
        let section = Section::from_str(raw).map_err(|e| CliError::new(e.to_string()))?;
        sections.insert(section);
    }

    let from = args
        .from
        .as_deref()
        .map(|raw| parse_date("from", raw))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|raw| parse_date("to", raw))
        .transpose()?;

    Ok(ExportRequest {
        sections,
        from,
        to,
        format,
        file_stem: args.stem.clone(),
    })
}

pub fn run(args: &ExportArgs, mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let request = match parse_request(args) {
        Ok(request) => request,
        Err(err) => {
            render_error(mode, &err)?;
            return Err(Reported.into());
        }
    };

    let artifact = match export::render(&request, state) {
        Ok(artifact) => artifact,
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    };

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let payload = ExportPayload {
        file: path.display().to_string(),
        bytes: artifact.bytes.len(),
        sections: request.sections.iter().map(ToString::to_string).collect(),
    };
    render(mode, &payload, |payload, w| {
        writeln!(
            w,
            "✓ exported {} ({} bytes; {})",
            payload.file,
            payload.bytes,
            payload.sections.join(", ")
        )
    })
}
