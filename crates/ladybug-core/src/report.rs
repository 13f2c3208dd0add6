//! Reports-page aggregation: trends, distributions, and summary metrics.
//!
//! Like everything in `derive`, these are pure functions over store
//! snapshots. Resolution time is approximated by `updated_at - created_at`
//! on resolved/closed bugs, since the last mutation of a finished bug is
//! its resolution.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

use crate::derive::UNKNOWN;
use crate::model::bucket::Bucket;
use crate::model::bug::{Bug, Severity};
use crate::model::team::Team;

/// Created/resolved counts for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTrend {
    /// ISO week label, e.g. `2023-W15`.
    pub week: String,
    pub created: usize,
    pub resolved: usize,
}

fn iso_week_label(ts: DateTime<Utc>) -> String {
    let week = ts.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Created-vs-resolved counts for the last `weeks` ISO weeks ending at
/// `now`, oldest first, zero-filled for quiet weeks.
#[must_use]
pub fn weekly_trend(bugs: &[Bug], weeks: usize, now: DateTime<Utc>) -> Vec<WeekTrend> {
    (0..weeks)
        .rev()
        .map(|offset| {
            let label = iso_week_label(now - Duration::weeks(offset as i64));
            let created = bugs
                .iter()
                .filter(|b| iso_week_label(b.created_at) == label)
                .count();
            let resolved = bugs
                .iter()
                .filter(|b| b.status.is_resolved() && iso_week_label(b.updated_at) == label)
                .count();
            WeekTrend {
                week: label,
                created,
                resolved,
            }
        })
        .collect()
}

/// Bug count for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: String,
    pub count: usize,
}

/// Bug count per bucket, zero-filled over the bucket collection. Bugs
/// referencing a bucket that no longer exists are grouped under
/// [`UNKNOWN`].
#[must_use]
pub fn bucket_distribution(bugs: &[Bug], buckets: &[Bucket]) -> Vec<BucketCount> {
    let mut rows: Vec<BucketCount> = buckets
        .iter()
        .map(|bucket| BucketCount {
            bucket: bucket.name.clone(),
            count: bugs.iter().filter(|b| b.bucket == bucket.id).count(),
        })
        .collect();

    let stray = bugs
        .iter()
        .filter(|b| !buckets.iter().any(|bucket| bucket.id == b.bucket))
        .count();
    if stray > 0 {
        rows.push(BucketCount {
            bucket: UNKNOWN.to_string(),
            count: stray,
        });
    }
    rows
}

/// Key metrics for the summary card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_bugs: usize,
    /// Resolved-or-closed share of all bugs, as a percentage. Zero for an
    /// empty collection.
    pub resolution_rate: f64,
    /// Mean days from creation to last update over resolved/closed bugs.
    pub avg_resolution_days: f64,
    /// Unresolved bugs at Critical severity.
    pub open_critical: usize,
}

#[must_use]
pub fn summary(bugs: &[Bug]) -> Summary {
    let total = bugs.len();
    let resolved: Vec<&Bug> = bugs.iter().filter(|b| b.status.is_resolved()).collect();

    #[allow(clippy::cast_precision_loss)]
    let resolution_rate = if total == 0 {
        0.0
    } else {
        resolved.len() as f64 / total as f64 * 100.0
    };

    #[allow(clippy::cast_precision_loss)]
    let avg_resolution_days = if resolved.is_empty() {
        0.0
    } else {
        let total_secs: i64 = resolved
            .iter()
            .map(|b| (b.updated_at - b.created_at).num_seconds())
            .sum();
        total_secs as f64 / resolved.len() as f64 / 86_400.0
    };

    let open_critical = bugs
        .iter()
        .filter(|b| !b.status.is_resolved() && b.severity == Severity::Critical)
        .count();

    Summary {
        total_bugs: total,
        resolution_rate,
        avg_resolution_days,
        open_critical,
    }
}

/// One member row of the team-performance table, tagged with the owning
/// team's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPerformance {
    pub name: String,
    pub team: String,
    pub reported: usize,
    pub resolved: usize,
}

/// Per-member reported/resolved counts in roster order, each row tagged
/// with its team.
#[must_use]
pub fn member_performance(bugs: &[Bug], teams: &[Team]) -> Vec<MemberPerformance> {
    teams
        .iter()
        .flat_map(|team| {
            team.members.iter().map(|member| {
                let reported = bugs.iter().filter(|b| b.reported_by == member.name).count();
                let resolved = bugs
                    .iter()
                    .filter(|b| b.status.is_resolved() && b.assignee == Some(member.id))
                    .count();
                MemberPerformance {
                    name: member.name.clone(),
                    team: team.name.clone(),
                    reported,
                    resolved,
                }
            })
        })
        .collect()
}
