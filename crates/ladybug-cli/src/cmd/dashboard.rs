//! `lb dashboard` — the summary page.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use ladybug_core::config::ProjectConfig;
use ladybug_core::derive::{self, TeamActivity, TopPerformer};
use ladybug_core::state::AppState;

use crate::output::{percent_bar, render, OutputMode};

/// Arguments for `lb dashboard`.
#[derive(Args, Debug, Default)]
pub struct DashboardArgs {}

#[derive(Debug, Serialize)]
struct CriticalIssueRow {
    id: u32,
    title: String,
    severity: String,
    assignee: String,
}

/// Report payload for `lb dashboard`.
#[derive(Debug, Serialize)]
struct DashboardPayload {
    by_status: Vec<(String, usize)>,
    team_performance: Vec<TeamActivity>,
    bounty_progress: Vec<(String, f64)>,
    top_performers: Vec<TopPerformer>,
    critical_issues: Vec<CriticalIssueRow>,
}

/// Execute `lb dashboard`.
pub fn run(
    _args: &DashboardArgs,
    mode: OutputMode,
    state: &AppState,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let bugs = state.bugs.as_slice();
    let teams = state.teams.as_slice();

    let payload = DashboardPayload {
        by_status: derive::status_counts(bugs)
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect(),
        team_performance: derive::team_activity(bugs, teams),
        bounty_progress: derive::cadence_progress(state.bounties.as_slice())
            .into_iter()
            .map(|(cadence, progress)| (cadence.to_string(), progress))
            .collect(),
        top_performers: derive::top_performers(bugs, teams, config.dashboard.top_performers),
        critical_issues: derive::critical_issues(bugs)
            .into_iter()
            .map(|bug| CriticalIssueRow {
                id: bug.id.raw(),
                title: bug.title.clone(),
                severity: bug.severity.to_string(),
                assignee: state.assignee_label(bug.assignee).to_string(),
            })
            .collect(),
    };

    render(mode, &payload, |payload, w| render_human(payload, w))
}

fn render_human(payload: &DashboardPayload, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Dashboard")?;

    writeln!(w, "\nBugs by status:")?;
    let total: usize = payload.by_status.iter().map(|(_, n)| n).sum();
    for (status, count) in &payload.by_status {
        #[allow(clippy::cast_precision_loss)]
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        writeln!(w, "  {:<12} {:>3}  {}", status, count, percent_bar(share, 20))?;
    }

    writeln!(w, "\nTeam performance:")?;
    for team in &payload.team_performance {
        writeln!(
            w,
            "  {:<12} reported: {:>3}  resolved: {:>3}",
            team.team, team.reported, team.resolved
        )?;
    }

    writeln!(w, "\nBounty progress:")?;
    for (cadence, progress) in &payload.bounty_progress {
        writeln!(w, "  {:<8} {}", cadence, percent_bar(*progress, 20))?;
    }

    writeln!(w, "\nTop performers:")?;
    if payload.top_performers.is_empty() {
        writeln!(w, "  (no resolutions yet)")?;
    }
    for performer in &payload.top_performers {
        writeln!(
            w,
            "  {:<16} resolved: {:>3}  reward: ${}",
            performer.name, performer.resolved, performer.reward
        )?;
    }

    writeln!(w, "\nCritical issues:")?;
    if payload.critical_issues.is_empty() {
        writeln!(w, "  (none open)")?;
    }
    for issue in &payload.critical_issues {
        writeln!(
            w,
            "  [{}] {:<42} {:<9} {}",
            issue.id, issue.title, issue.severity, issue.assignee
        )?;
    }

    Ok(())
}
