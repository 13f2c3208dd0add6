//! `lb buckets` — the buckets half of the Teams & Buckets page.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use ladybug_core::form::{BucketDraft, FormSession};
use ladybug_core::model::id::{BucketId, TeamId};
use ladybug_core::state::AppState;

use crate::output::{render, render_error, render_success, CliError, OutputMode, Reported};

#[derive(Subcommand, Debug)]
pub enum BucketsCommand {
    /// List buckets and their assigned teams.
    List,
    /// Create a new bucket.
    Add(AddArgs),
    /// Delete a bucket (restricted while bugs reference it).
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Bucket name.
    #[arg(long)]
    pub name: String,

    /// Bucket description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Team ids the bucket is assigned to (repeatable).
    #[arg(long = "team")]
    pub teams: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Bucket id.
    pub id: u32,
}

#[derive(Debug, Serialize)]
struct BucketRow {
    id: u32,
    name: String,
    description: String,
    teams: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BucketListPayload {
    buckets: Vec<BucketRow>,
    total: usize,
}

pub fn run(command: &BucketsCommand, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match command {
        BucketsCommand::List => run_list(mode, state),
        BucketsCommand::Add(args) => run_add(args, mode, state),
        BucketsCommand::Delete(args) => run_delete(args, mode, state),
    }
}

fn run_list(mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let buckets: Vec<BucketRow> = state
        .buckets
        .iter()
        .map(|bucket| BucketRow {
            id: bucket.id.raw(),
            name: bucket.name.clone(),
            description: bucket.description.clone(),
            teams: bucket
                .teams
                .iter()
                .map(|&id| state.team_name(id).unwrap_or("unknown").to_string())
                .collect(),
        })
        .collect();
    let payload = BucketListPayload {
        total: buckets.len(),
        buckets,
    };

    render(mode, &payload, |payload, w| {
        for bucket in &payload.buckets {
            writeln!(
                w,
                "[{}] {:<20} {:<44} teams: {}",
                bucket.id,
                bucket.name,
                bucket.description,
                bucket.teams.join(", ")
            )?;
        }
        writeln!(w, "\n{} bucket(s)", payload.total)
    })
}

fn run_add(args: &AddArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    for &team in &args.teams {
        if state.teams.get(TeamId(team)).is_none() {
            render_error(mode, &CliError::new(format!("team {team} not found")))?;
            return Err(Reported.into());
        }
    }

    let mut session: FormSession<BucketDraft> = FormSession::new();
    session.open(BucketDraft {
        name: args.name.clone(),
        description: args.description.clone(),
        teams: args.teams.iter().map(|&id| TeamId(id)).collect(),
    });

    let draft = match session.commit() {
        Ok(draft) => draft,
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    };

    match state.buckets.create(draft.into_bucket()) {
        Ok(bucket) => {
            render_success(mode, &format!("bucket {} created: {}", bucket.id, bucket.name))
        }
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_delete(args: &DeleteArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match state.delete_bucket(BucketId(args.id)) {
        Ok(()) => render_success(mode, &format!("bucket {} deleted", args.id)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}
