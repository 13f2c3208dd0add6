//! `lb report` — trends, distributions, and summary metrics.

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use ladybug_core::config::ProjectConfig;
use ladybug_core::report::{self, BucketCount, MemberPerformance, Summary, WeekTrend};
use ladybug_core::state::AppState;

use crate::output::{render, OutputMode};

/// Arguments for `lb report`.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Weeks covered by the created-vs-resolved trend (defaults to config).
    #[arg(long)]
    pub weeks: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ReportPayload {
    trend: Vec<WeekTrend>,
    by_bucket: Vec<BucketCount>,
    by_severity: Vec<(String, usize)>,
    summary: Summary,
    team_performance: Vec<MemberPerformance>,
}

/// Execute `lb report`.
pub fn run(
    args: &ReportArgs,
    mode: OutputMode,
    state: &AppState,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let bugs = state.bugs.as_slice();
    let weeks = args.weeks.unwrap_or(config.report.trend_weeks);

    // Anchor the trend window at the latest recorded activity so a dataset
    // that ends in the past still produces a meaningful chart.
    let anchor = bugs
        .iter()
        .map(|b| b.updated_at)
        .max()
        .unwrap_or_else(Utc::now);

    let payload = ReportPayload {
        trend: report::weekly_trend(bugs, weeks, anchor),
        by_bucket: report::bucket_distribution(bugs, state.buckets.as_slice()),
        by_severity: ladybug_core::derive::severity_counts(bugs)
            .into_iter()
            .map(|(severity, count)| (severity.to_string(), count))
            .collect(),
        summary: report::summary(bugs),
        team_performance: report::member_performance(bugs, state.teams.as_slice()),
    };

    render(mode, &payload, |payload, w| render_human(payload, w))
}

fn render_human(payload: &ReportPayload, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Reports")?;

    writeln!(w, "\nBugs created vs resolved:")?;
    for week in &payload.trend {
        writeln!(
            w,
            "  {:<9} created: {:>3}  resolved: {:>3}",
            week.week, week.created, week.resolved
        )?;
    }

    writeln!(w, "\nBugs by bucket:")?;
    for row in &payload.by_bucket {
        writeln!(w, "  {:<20} {}", row.bucket, row.count)?;
    }

    writeln!(w, "\nBugs by severity:")?;
    for (severity, count) in &payload.by_severity {
        writeln!(w, "  {severity:<9} {count}")?;
    }

    writeln!(w, "\nSummary:")?;
    writeln!(w, "  total bugs:           {}", payload.summary.total_bugs)?;
    writeln!(w, "  resolution rate:      {:.1}%", payload.summary.resolution_rate)?;
    writeln!(
        w,
        "  avg resolution (days): {:.1}",
        payload.summary.avg_resolution_days
    )?;
    writeln!(w, "  open critical:        {}", payload.summary.open_critical)?;

    writeln!(w, "\nTeam member performance:")?;
    for row in &payload.team_performance {
        writeln!(
            w,
            "  {:<16} {:<10} reported: {:>3}  resolved: {:>3}",
            row.name, row.team, row.reported, row.resolved
        )?;
    }

    Ok(())
}
