//! `lb bounties` — active bounties and reward history.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use ladybug_core::derive;
use ladybug_core::form::{BountyDraft, FormSession};
use ladybug_core::model::bounty::Cadence;
use ladybug_core::state::AppState;

use crate::output::{percent_bar, render, render_error, CliError, OutputMode, Reported};

#[derive(Subcommand, Debug)]
pub enum BountiesCommand {
    /// List bounties grouped by cadence.
    List(ListArgs),
    /// Create a new bounty.
    Add(AddArgs),
    /// Show reward history per team and member.
    Rewards,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Restrict to one cadence (daily, weekly, sprint).
    #[arg(long)]
    pub cadence: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Bounty title.
    #[arg(long)]
    pub title: String,

    /// Short description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Deadline date (YYYY-MM-DD).
    #[arg(long)]
    pub deadline: String,

    /// Goal target (positive integer).
    #[arg(long)]
    pub target: String,

    /// Reward, e.g. 100 or $100.
    #[arg(long)]
    pub reward: String,

    /// Cadence (daily, weekly, sprint).
    #[arg(long, default_value = "daily")]
    pub cadence: String,
}

#[derive(Debug, Serialize)]
struct BountyRow {
    id: u32,
    title: String,
    cadence: String,
    deadline: String,
    current: u32,
    target: u32,
    progress: f64,
    reward: String,
}

#[derive(Debug, Serialize)]
struct BountyListPayload {
    bounties: Vec<BountyRow>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct RewardsPayload {
    by_month: Vec<derive::MonthTeamRewards>,
    totals: Vec<(String, u32)>,
}

pub fn run(command: &BountiesCommand, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match command {
        BountiesCommand::List(args) => run_list(args, mode, state),
        BountiesCommand::Add(args) => run_add(args, mode, state),
        BountiesCommand::Rewards => run_rewards(mode, state),
    }
}

fn run_list(args: &ListArgs, mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let cadence = match &args.cadence {
        Some(raw) => match Cadence::from_str(raw) {
            Ok(cadence) => Some(cadence),
            Err(e) => {
                render_error(mode, &CliError::new(e.to_string()))?;
                return Err(Reported.into());
            }
        },
        None => None,
    };

    let bounties: Vec<BountyRow> = state
        .bounties
        .iter()
        .filter(|b| cadence.map_or(true, |c| b.cadence == c))
        .map(|b| BountyRow {
            id: b.id.raw(),
            title: b.title.clone(),
            cadence: b.cadence.to_string(),
            deadline: b.deadline.to_string(),
            current: b.current,
            target: b.target,
            progress: b.progress_percent(),
            reward: b.reward.clone(),
        })
        .collect();
    let payload = BountyListPayload {
        total: bounties.len(),
        bounties,
    };

    render(mode, &payload, |payload, w| {
        for group in Cadence::ALL {
            let rows: Vec<&BountyRow> = payload
                .bounties
                .iter()
                .filter(|r| r.cadence == group.to_string())
                .collect();
            if rows.is_empty() {
                continue;
            }
            writeln!(w, "{}", group.label())?;
            for row in rows {
                writeln!(
                    w,
                    "  [{}] {:<34} due {}  {:>6}  {}/{}  {}",
                    row.id,
                    row.title,
                    row.deadline,
                    row.reward,
                    row.current,
                    row.target,
                    percent_bar(row.progress, 10)
                )?;
            }
        }
        writeln!(w, "\n{} bounty(ies)", payload.total)
    })
}

fn run_add(args: &AddArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    let cadence = match Cadence::from_str(&args.cadence) {
        Ok(cadence) => cadence,
        Err(e) => {
            render_error(mode, &CliError::new(e.to_string()))?;
            return Err(Reported.into());
        }
    };
    let deadline = match NaiveDate::from_str(&args.deadline) {
        Ok(date) => Some(date),
        Err(_) => {
            render_error(
                mode,
                &CliError::new(format!("invalid deadline: '{}'", args.deadline)),
            )?;
            return Err(Reported.into());
        }
    };

    let mut session: FormSession<BountyDraft> = FormSession::new();
    session.open(BountyDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        deadline,
        target: args.target.clone(),
        reward: args.reward.clone(),
        cadence,
    });

    let draft = match session.commit() {
        Ok(draft) => draft,
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    };

    match state.bounties.create(draft.into_bounty()) {
        Ok(bounty) => {
            let row = BountyRow {
                id: bounty.id.raw(),
                title: bounty.title.clone(),
                cadence: bounty.cadence.to_string(),
                deadline: bounty.deadline.to_string(),
                current: bounty.current,
                target: bounty.target,
                progress: bounty.progress_percent(),
                reward: bounty.reward.clone(),
            };
            render(mode, &row, |row, w| {
                writeln!(w, "✓ bounty {} created: {} ({})", row.id, row.title, row.reward)
            })
        }
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_rewards(mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let payload = RewardsPayload {
        by_month: derive::team_rewards_by_month(&state.rewards, state.teams.as_slice()),
        totals: derive::reward_totals(&state.rewards),
    };

    render(mode, &payload, |payload, w| {
        writeln!(w, "Team rewards by month:")?;
        for month in &payload.by_month {
            let rows: Vec<String> = month
                .totals
                .iter()
                .map(|(team, total)| format!("{team}: ${total}"))
                .collect();
            writeln!(w, "  {:<4} {}", month.month, rows.join("  "))?;
        }
        writeln!(w, "\nIndividual totals:")?;
        for (member, total) in &payload.totals {
            writeln!(w, "  {member:<16} ${total}")?;
        }
        Ok(())
    })
}
