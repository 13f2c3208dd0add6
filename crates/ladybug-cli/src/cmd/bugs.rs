//! `lb bugs` — the bug tracking page.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use ladybug_core::derive::{self, BugFilter, SortDirection, SortKey};
use ladybug_core::form::{BugDraft, FormSession};
use ladybug_core::model::bug::{Bug, Severity, Status};
use ladybug_core::model::id::{BucketId, BugId, MemberId};
use ladybug_core::state::AppState;

use crate::output::{render, render_error, render_success, CliError, OutputMode, Reported};

#[derive(Subcommand, Debug)]
pub enum BugsCommand {
    /// List bugs with optional filters and sort order.
    List(ListArgs),
    /// Report a new bug.
    Create(CreateArgs),
    /// Update fields on an existing bug.
    Update(UpdateArgs),
    /// Delete a bug.
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter by status (new, in-progress, testing, resolved, closed).
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by severity (low, medium, high, critical).
    #[arg(long)]
    pub severity: Option<String>,

    /// Filter by bucket id.
    #[arg(long)]
    pub bucket: Option<u32>,

    /// Case-insensitive search over title and description.
    #[arg(long)]
    pub search: Option<String>,

    /// Sort key: updated, created, or severity.
    #[arg(long, default_value = "updated")]
    pub sort: String,

    /// Sort ascending instead of descending.
    #[arg(long)]
    pub asc: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Bug title.
    #[arg(long)]
    pub title: String,

    /// Detailed explanation of the issue.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Severity (low, medium, high, critical).
    #[arg(long)]
    pub severity: Option<String>,

    /// Bucket id the bug belongs to.
    #[arg(long)]
    pub bucket: Option<u32>,

    /// Assignee member id; omit for unassigned.
    #[arg(long)]
    pub assignee: Option<u32>,

    /// Reporter name.
    #[arg(long, default_value = "")]
    pub reporter: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Bug id.
    pub id: u32,

    /// New status.
    #[arg(long)]
    pub status: Option<String>,

    /// New severity.
    #[arg(long)]
    pub severity: Option<String>,

    /// New assignee member id; 0 clears the assignment.
    #[arg(long)]
    pub assignee: Option<u32>,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Bug id.
    pub id: u32,
}

/// One row of bug list output.
#[derive(Debug, Serialize)]
struct BugRow {
    id: u32,
    title: String,
    status: String,
    severity: String,
    bucket: String,
    assignee: String,
    updated_at: String,
}

impl BugRow {
    fn from_bug(bug: &Bug, state: &AppState) -> Self {
        Self {
            id: bug.id.raw(),
            title: bug.title.clone(),
            status: bug.status.to_string(),
            severity: bug.severity.to_string(),
            bucket: state.bucket_name(bug.bucket).unwrap_or("unknown").to_string(),
            assignee: state.assignee_label(bug.assignee).to_string(),
            updated_at: bug.updated_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BugListPayload {
    bugs: Vec<BugRow>,
    total: usize,
}

fn parse_filter(args: &ListArgs) -> Result<BugFilter, CliError> {
    let status = match &args.status {
        Some(raw) => Some(Status::from_str(raw).map_err(|e| CliError::new(e.to_string()))?),
        None => None,
    };
    let severity = match &args.severity {
        Some(raw) => Some(Severity::from_str(raw).map_err(|e| CliError::new(e.to_string()))?),
        None => None,
    };
    Ok(BugFilter {
        status,
        severity,
        bucket: args.bucket.map(BucketId),
        search: args.search.clone().unwrap_or_default(),
    })
}

fn parse_sort(raw: &str) -> Result<SortKey, CliError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "updated" => Ok(SortKey::Updated),
        "created" => Ok(SortKey::Created),
        "severity" => Ok(SortKey::Severity),
        other => Err(CliError::new(format!("invalid sort key: '{other}'"))),
    }
}

pub fn run(command: &BugsCommand, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match command {
        BugsCommand::List(args) => run_list(args, mode, state),
        BugsCommand::Create(args) => run_create(args, mode, state),
        BugsCommand::Update(args) => run_update(args, mode, state),
        BugsCommand::Delete(args) => run_delete(args, mode, state),
    }
}

fn run_list(args: &ListArgs, mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let filter = match parse_filter(args) {
        Ok(filter) => filter,
        Err(err) => {
            render_error(mode, &err)?;
            return Err(Reported.into());
        }
    };
    let sort = match parse_sort(&args.sort) {
        Ok(sort) => sort,
        Err(err) => {
            render_error(mode, &err)?;
            return Err(Reported.into());
        }
    };
    let direction = if args.asc {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    let mut bugs = filter.apply(state.bugs.as_slice());
    derive::sort_bugs(&mut bugs, sort, direction);

    let rows: Vec<BugRow> = bugs.iter().map(|b| BugRow::from_bug(b, state)).collect();
    let payload = BugListPayload {
        total: rows.len(),
        bugs: rows,
    };

    render(mode, &payload, |payload, w| {
        if payload.bugs.is_empty() {
            return writeln!(w, "No bugs found matching your filters");
        }
        writeln!(
            w,
            "{:<4} {:<42} {:<12} {:<9} {:<20} {:<14} {}",
            "ID", "TITLE", "STATUS", "SEVERITY", "BUCKET", "ASSIGNEE", "UPDATED"
        )?;
        for row in &payload.bugs {
            writeln!(
                w,
                "{:<4} {:<42} {:<12} {:<9} {:<20} {:<14} {}",
                row.id,
                truncate(&row.title, 42),
                row.status,
                row.severity,
                truncate(&row.bucket, 20),
                truncate(&row.assignee, 14),
                row.updated_at
            )?;
        }
        writeln!(w, "\n{} bug(s)", payload.total)
    })
}

fn run_create(args: &CreateArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    let severity = match &args.severity {
        Some(raw) => match Severity::from_str(raw) {
            Ok(sev) => sev,
            Err(e) => {
                render_error(mode, &CliError::new(e.to_string()))?;
                return Err(Reported.into());
            }
        },
        None => Severity::Medium,
    };

    // Commit through a form session so the CLI path and the TUI dialog
    // share one validation gate.
    let mut session: FormSession<BugDraft> = FormSession::new();
    session.open(BugDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        severity,
        bucket: args.bucket.map(BucketId),
        assignee: args.assignee.map(MemberId),
        reported_by: args.reporter.clone(),
        ..BugDraft::default()
    });

    let draft = match session.commit() {
        Ok(draft) => draft,
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    };

    if let Some(bucket) = draft.bucket {
        if state.buckets.get(bucket).is_none() {
            render_error(mode, &CliError::new(format!("bucket {bucket} not found")))?;
            return Err(Reported.into());
        }
    }

    match state.bugs.create(draft.into_bug()) {
        Ok(bug) => {
            let bug = bug.clone();
            let row = BugRow::from_bug(&bug, state);
            render(mode, &row, |row, w| {
                writeln!(w, "✓ bug {} created: {}", row.id, row.title)
            })
        }
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_update(args: &UpdateArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    let status = match &args.status {
        Some(raw) => match Status::from_str(raw) {
            Ok(status) => Some(status),
            Err(e) => {
                render_error(mode, &CliError::new(e.to_string()))?;
                return Err(Reported.into());
            }
        },
        None => None,
    };
    let severity = match &args.severity {
        Some(raw) => match Severity::from_str(raw) {
            Ok(sev) => Some(sev),
            Err(e) => {
                render_error(mode, &CliError::new(e.to_string()))?;
                return Err(Reported.into());
            }
        },
        None => None,
    };

    let result = state.bugs.update(BugId(args.id), |bug| {
        if let Some(status) = status {
            bug.status = status;
        }
        if let Some(severity) = severity {
            bug.severity = severity;
        }
        if let Some(assignee) = args.assignee {
            bug.assignee = if assignee == 0 {
                None
            } else {
                Some(MemberId(assignee))
            };
        }
        if let Some(ref title) = args.title {
            bug.title = title.clone();
        }
    });

    match result {
        Ok(bug) => {
            let bug = bug.clone();
            let row = BugRow::from_bug(&bug, state);
            render(mode, &row, |row, w| {
                writeln!(w, "✓ bug {} updated ({})", row.id, row.status)
            })
        }
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_delete(args: &DeleteArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match state.bugs.remove(BugId(args.id)) {
        Ok(bug) => render_success(mode, &format!("bug {} deleted: {}", args.id, bug.title)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
