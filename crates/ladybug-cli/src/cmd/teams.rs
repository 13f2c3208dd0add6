//! `lb teams` — the teams half of the Teams & Buckets page.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use ladybug_core::form::{FormSession, MemberDraft, TeamDraft};
use ladybug_core::model::id::{MemberId, TeamId};
use ladybug_core::state::AppState;

use crate::output::{render, render_error, render_success, CliError, OutputMode, Reported};

#[derive(Subcommand, Debug)]
pub enum TeamsCommand {
    /// List teams with their member rosters.
    List,
    /// Create a new team.
    Add(AddArgs),
    /// Add a member to a team.
    AddMember(AddMemberArgs),
    /// Remove a member; their bugs become unassigned.
    RemoveMember(RemoveMemberArgs),
    /// Delete a team (restricted while it has members or bucket references).
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Team name.
    #[arg(long)]
    pub name: String,

    /// Team description.
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct AddMemberArgs {
    /// Team id the member joins.
    #[arg(long)]
    pub team: u32,

    /// Member name.
    #[arg(long)]
    pub name: String,

    /// Member designation.
    #[arg(long)]
    pub designation: String,
}

#[derive(Args, Debug)]
pub struct RemoveMemberArgs {
    /// Team id the member belongs to.
    #[arg(long)]
    pub team: u32,

    /// Member id.
    pub id: u32,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Team id.
    pub id: u32,
}

#[derive(Debug, Serialize)]
struct MemberRow {
    id: u32,
    name: String,
    designation: String,
}

#[derive(Debug, Serialize)]
struct TeamRow {
    id: u32,
    name: String,
    description: String,
    members: Vec<MemberRow>,
}

#[derive(Debug, Serialize)]
struct TeamListPayload {
    teams: Vec<TeamRow>,
    total: usize,
}

pub fn run(command: &TeamsCommand, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match command {
        TeamsCommand::List => run_list(mode, state),
        TeamsCommand::Add(args) => run_add(args, mode, state),
        TeamsCommand::AddMember(args) => run_add_member(args, mode, state),
        TeamsCommand::RemoveMember(args) => run_remove_member(args, mode, state),
        TeamsCommand::Delete(args) => run_delete(args, mode, state),
    }
}

fn run_list(mode: OutputMode, state: &AppState) -> anyhow::Result<()> {
    let teams: Vec<TeamRow> = state
        .teams
        .iter()
        .map(|team| TeamRow {
            id: team.id.raw(),
            name: team.name.clone(),
            description: team.description.clone(),
            members: team
                .members
                .iter()
                .map(|m| MemberRow {
                    id: m.id.raw(),
                    name: m.name.clone(),
                    designation: m.designation.clone(),
                })
                .collect(),
        })
        .collect();
    let payload = TeamListPayload {
        total: teams.len(),
        teams,
    };

    render(mode, &payload, |payload, w| {
        for team in &payload.teams {
            writeln!(w, "[{}] {} — {}", team.id, team.name, team.description)?;
            if team.members.is_empty() {
                writeln!(w, "    (no members yet)")?;
            }
            for member in &team.members {
                writeln!(w, "    {:<3} {} ({})", member.id, member.name, member.designation)?;
            }
        }
        writeln!(w, "\n{} team(s)", payload.total)
    })
}

fn run_add(args: &AddArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    let mut session: FormSession<TeamDraft> = FormSession::new();
    session.open(TeamDraft {
        name: args.name.clone(),
        description: args.description.clone(),
    });

    let draft = match session.commit() {
        Ok(draft) => draft,
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    };

    match state.teams.create(draft.into_team()) {
        Ok(team) => render_success(mode, &format!("team {} created: {}", team.id, team.name)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_add_member(args: &AddMemberArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    let draft = MemberDraft {
        name: args.name.clone(),
        designation: args.designation.clone(),
        team: Some(TeamId(args.team)),
    };
    match state.add_member(draft) {
        Ok(id) => render_success(mode, &format!("member {id} added to team {}", args.team)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_remove_member(
    args: &RemoveMemberArgs,
    mode: OutputMode,
    state: &mut AppState,
) -> anyhow::Result<()> {
    match state.remove_member(TeamId(args.team), MemberId(args.id)) {
        Ok(()) => render_success(mode, &format!("member {} removed", args.id)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}

fn run_delete(args: &DeleteArgs, mode: OutputMode, state: &mut AppState) -> anyhow::Result<()> {
    match state.delete_team(TeamId(args.id)) {
        Ok(()) => render_success(mode, &format!("team {} deleted", args.id)),
        Err(err) => {
            render_error(mode, &CliError::from(&err))?;
            return Err(Reported.into());
        }
    }
}
