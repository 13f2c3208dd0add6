//! Pure read-only derivations over store snapshots.
//!
//! Everything here is side-effect free: filters, stable sorts, zero-filled
//! group counts, progress math, and the joined aggregates the dashboard and
//! reports pages render. Nothing in this module mutates a store.

use crate::model::bounty::{Bounty, Cadence, RewardEntry};
use crate::model::bug::{Bug, Severity, Status};
use crate::model::id::{BucketId, MemberId};
use crate::model::team::Team;

/// Row label used when a by-name reference matches no known member or team.
pub const UNKNOWN: &str = "unknown";

/// Reward paid out per resolved bug on the top-performers card.
const REWARD_PER_RESOLUTION: u32 = 10;

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Filter criteria applied to the bug list. All active criteria must match
/// (conjunction); an inactive criterion matches everything.
#[derive(Debug, Clone, Default)]
pub struct BugFilter {
    pub status: Option<Status>,
    pub severity: Option<Severity>,
    pub bucket: Option<BucketId>,
    /// Free-text search, matched case-insensitively against title and
    /// description.
    pub search: String,
}

impl BugFilter {
    /// Returns true if no filter criteria are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.severity.is_none()
            && self.bucket.is_none()
            && self.search.is_empty()
    }

    /// Returns true if the bug satisfies all active criteria.
    #[must_use]
    pub fn matches(&self, bug: &Bug) -> bool {
        if let Some(status) = self.status {
            if bug.status != status {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if bug.severity != severity {
                return false;
            }
        }
        if let Some(bucket) = self.bucket {
            if bug.bucket != bucket {
                return false;
            }
        }
        if !self.search.is_empty() {
            let q = self.search.to_lowercase();
            if !bug.title.to_lowercase().contains(&q)
                && !bug.description.to_lowercase().contains(&q)
            {
                return false;
            }
        }
        true
    }

    /// Apply this filter to a snapshot. No match yields an empty vec, never
    /// an error.
    #[must_use]
    pub fn apply(&self, bugs: &[Bug]) -> Vec<Bug> {
        bugs.iter().filter(|b| self.matches(b)).cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort key for the bug list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently changed first (when descending).
    #[default]
    Updated,
    Created,
    /// Severity rank: Critical > High > Medium > Low.
    Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Sort bugs in place. The sort is stable: ties preserve prior relative
/// order, which matters when sorting an already-filtered list.
pub fn sort_bugs(bugs: &mut [Bug], key: SortKey, direction: SortDirection) {
    bugs.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Updated => a.updated_at.cmp(&b.updated_at),
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Severity => a.severity.rank().cmp(&b.severity.rank()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

// ---------------------------------------------------------------------------
// Group counts and progress
// ---------------------------------------------------------------------------

/// Bug count per status, zero-filled over all five statuses in board order
/// so summary bars and board columns render deterministically.
#[must_use]
pub fn status_counts(bugs: &[Bug]) -> Vec<(Status, usize)> {
    Status::ALL
        .iter()
        .map(|&status| (status, bugs.iter().filter(|b| b.status == status).count()))
        .collect()
}

/// Bug count per severity, zero-filled, ascending rank order.
#[must_use]
pub fn severity_counts(bugs: &[Bug]) -> Vec<(Severity, usize)> {
    Severity::ALL
        .iter()
        .map(|&sev| (sev, bugs.iter().filter(|b| b.severity == sev).count()))
        .collect()
}

/// `current / target * 100`. A target of zero yields `0.0` by policy: the
/// degenerate input is flagged at validation time, and the derivation must
/// never surface NaN or infinity to a renderer.
#[must_use]
pub fn progress_percent(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    f64::from(current) / f64::from(target) * 100.0
}

// ---------------------------------------------------------------------------
// Joined aggregates
// ---------------------------------------------------------------------------

/// Per-member reported/resolved tallies.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MemberActivity {
    pub name: String,
    pub reported: usize,
    pub resolved: usize,
}

/// Join bugs against the member roster.
///
/// `reported` counts bugs whose free-form reporter name matches the member;
/// `resolved` counts resolved/closed bugs assigned to the member. Reporter
/// names matching no member, and assignees pointing at no known member,
/// are accumulated under a trailing [`UNKNOWN`] row rather than dropped.
#[must_use]
pub fn member_activity(bugs: &[Bug], teams: &[Team]) -> Vec<MemberActivity> {
    let mut rows: Vec<MemberActivity> = teams
        .iter()
        .flat_map(|t| t.members.iter())
        .map(|m| MemberActivity {
            name: m.name.clone(),
            reported: 0,
            resolved: 0,
        })
        .collect();
    let mut unknown = MemberActivity {
        name: UNKNOWN.to_string(),
        reported: 0,
        resolved: 0,
    };

    for bug in bugs {
        match rows.iter_mut().find(|r| r.name == bug.reported_by) {
            Some(row) => row.reported += 1,
            None => unknown.reported += 1,
        }

        if bug.status.is_resolved() {
            if let Some(assignee) = bug.assignee {
                match member_name(teams, assignee) {
                    Some(name) => {
                        if let Some(row) = rows.iter_mut().find(|r| r.name == name) {
                            row.resolved += 1;
                        }
                    }
                    None => unknown.resolved += 1,
                }
            }
        }
    }

    if unknown.reported > 0 || unknown.resolved > 0 {
        rows.push(unknown);
    }
    rows
}

/// Per-team reported/resolved totals for the dashboard performance chart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TeamActivity {
    pub team: String,
    pub reported: usize,
    pub resolved: usize,
}

#[must_use]
pub fn team_activity(bugs: &[Bug], teams: &[Team]) -> Vec<TeamActivity> {
    teams
        .iter()
        .map(|team| {
            let reported = bugs
                .iter()
                .filter(|b| team.members.iter().any(|m| m.name == b.reported_by))
                .count();
            let resolved = bugs
                .iter()
                .filter(|b| {
                    b.status.is_resolved()
                        && b.assignee.is_some_and(|id| team.member(id).is_some())
                })
                .count();
            TeamActivity {
                team: team.name.clone(),
                reported,
                resolved,
            }
        })
        .collect()
}

/// Mean display progress per cadence, zero-filled over all three cadences.
#[must_use]
pub fn cadence_progress(bounties: &[Bounty]) -> Vec<(Cadence, f64)> {
    Cadence::ALL
        .iter()
        .map(|&cadence| {
            let group: Vec<&Bounty> =
                bounties.iter().filter(|b| b.cadence == cadence).collect();
            if group.is_empty() {
                return (cadence, 0.0);
            }
            #[allow(clippy::cast_precision_loss)]
            let mean = group.iter().map(|b| b.progress_percent()).sum::<f64>()
                / group.len() as f64;
            (cadence, mean)
        })
        .collect()
}

/// One row of the dashboard top-performers card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TopPerformer {
    pub name: String,
    pub resolved: usize,
    /// Flat payout per resolution, matching the rewards card.
    pub reward: u32,
}

/// Members ranked by resolution count, descending, truncated to `limit`.
/// Members with zero resolutions are omitted. Equal counts keep roster
/// order.
#[must_use]
pub fn top_performers(bugs: &[Bug], teams: &[Team], limit: usize) -> Vec<TopPerformer> {
    let mut rows: Vec<TopPerformer> = member_activity(bugs, teams)
        .into_iter()
        .filter(|r| r.name != UNKNOWN && r.resolved > 0)
        .map(|r| {
            let reward = u32::try_from(r.resolved)
                .unwrap_or(u32::MAX)
                .saturating_mul(REWARD_PER_RESOLUTION);
            TopPerformer {
                name: r.name,
                resolved: r.resolved,
                reward,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.resolved.cmp(&a.resolved));
    rows.truncate(limit);
    rows
}

/// Unresolved High/Critical bugs, most severe first, most recently updated
/// first within a severity.
#[must_use]
pub fn critical_issues(bugs: &[Bug]) -> Vec<Bug> {
    let mut open: Vec<Bug> = bugs
        .iter()
        .filter(|b| !b.status.is_resolved() && b.severity.rank() >= Severity::High.rank())
        .cloned()
        .collect();
    open.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    open
}

// ---------------------------------------------------------------------------
// Reward history
// ---------------------------------------------------------------------------

/// Per-team reward totals for one month of the history chart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MonthTeamRewards {
    pub month: String,
    /// `(team name, total)` rows in team order; unmatched members land in a
    /// trailing [`UNKNOWN`] row.
    pub totals: Vec<(String, u32)>,
}

/// Group reward entries into per-team monthly totals. Months appear in
/// first-seen order; every month carries a row for every team (zero-filled).
#[must_use]
pub fn team_rewards_by_month(entries: &[RewardEntry], teams: &[Team]) -> Vec<MonthTeamRewards> {
    let mut months: Vec<MonthTeamRewards> = Vec::new();

    for entry in entries {
        let team_name = teams
            .iter()
            .find(|t| t.members.iter().any(|m| m.name == entry.member))
            .map_or(UNKNOWN, |t| t.name.as_str());

        let pos = match months.iter().position(|m| m.month == entry.month) {
            Some(pos) => pos,
            None => {
                let totals = teams.iter().map(|t| (t.name.clone(), 0)).collect();
                months.push(MonthTeamRewards {
                    month: entry.month.clone(),
                    totals,
                });
                months.len() - 1
            }
        };
        let month = &mut months[pos];

        match month.totals.iter_mut().find(|(name, _)| name == team_name) {
            Some((_, total)) => *total += entry.amount,
            None => month.totals.push((team_name.to_string(), entry.amount)),
        }
    }

    months
}

/// Total earned per member, in first-seen order.
#[must_use]
pub fn reward_totals(entries: &[RewardEntry]) -> Vec<(String, u32)> {
    let mut totals: Vec<(String, u32)> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|(name, _)| name == &entry.member) {
            Some((_, total)) => *total += entry.amount,
            None => totals.push((entry.member.clone(), entry.amount)),
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// Resolve a member id to its display name across all teams.
#[must_use]
pub fn member_name(teams: &[Team], id: MemberId) -> Option<&str> {
    teams
        .iter()
        .find_map(|t| t.member(id))
        .map(|m| m.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::{
        cadence_progress, critical_issues, member_activity, progress_percent, severity_counts,
        sort_bugs, status_counts, team_rewards_by_month, top_performers, BugFilter,
        SortDirection, SortKey, UNKNOWN,
    };
    use crate::model::bounty::{Bounty, Cadence, RewardEntry};
    use crate::model::bug::{Bug, Severity, Status};
    use crate::model::id::{BountyId, BucketId, BugId, MemberId, TeamId};
    use crate::model::team::{Member, Team};
    use chrono::{TimeZone, Utc};

    fn bug(id: u32, title: &str, status: Status, severity: Severity) -> Bug {
        let ts = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()
            + chrono::Duration::days(i64::from(id));
        Bug {
            id: BugId(id),
            title: title.into(),
            description: format!("{title} description"),
            status,
            severity,
            bucket: BucketId(1),
            assignee: None,
            reported_by: "Jamie Smith".into(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn qa_team() -> Team {
        Team {
            id: TeamId(1),
            name: "QA Team".into(),
            description: String::new(),
            members: vec![
                Member {
                    id: MemberId(1),
                    name: "Jamie Smith".into(),
                    designation: "Senior QA".into(),
                },
                Member {
                    id: MemberId(2),
                    name: "Alex Johnson".into(),
                    designation: "QA Engineer".into(),
                },
            ],
        }
    }

    #[test]
    fn filter_conjunction_and_search() {
        let bugs = vec![
            bug(1, "Login bypass", Status::New, Severity::High),
            bug(2, "Slow dashboard", Status::New, Severity::Low),
            bug(3, "Crash on export", Status::Closed, Severity::High),
        ];

        let filter = BugFilter {
            status: Some(Status::New),
            severity: Some(Severity::High),
            ..BugFilter::default()
        };
        let hits = filter.apply(&bugs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Login bypass");

        let search = BugFilter {
            search: "DASHBOARD".into(),
            ..BugFilter::default()
        };
        assert_eq!(search.apply(&bugs).len(), 1);
    }

    #[test]
    fn unmatched_search_yields_empty_vec() {
        let bugs = vec![bug(1, "Login bypass", Status::New, Severity::High)];
        let filter = BugFilter {
            search: "no such bug".into(),
            ..BugFilter::default()
        };
        assert!(filter.apply(&bugs).is_empty());
    }

    #[test]
    fn severity_sort_descending_is_stable() {
        let mut bugs = vec![
            bug(1, "low", Status::New, Severity::Low),
            bug(2, "critical", Status::New, Severity::Critical),
            bug(3, "medium-a", Status::New, Severity::Medium),
            bug(4, "medium-b", Status::New, Severity::Medium),
        ];
        sort_bugs(&mut bugs, SortKey::Severity, SortDirection::Descending);
        let titles: Vec<&str> = bugs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["critical", "medium-a", "medium-b", "low"]);
    }

    #[test]
    fn chronological_sort_by_updated() {
        let mut bugs = vec![
            bug(3, "newest", Status::New, Severity::Low),
            bug(1, "oldest", Status::New, Severity::Low),
            bug(2, "middle", Status::New, Severity::Low),
        ];
        sort_bugs(&mut bugs, SortKey::Updated, SortDirection::Descending);
        let titles: Vec<&str> = bugs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn status_counts_zero_fill() {
        let bugs = vec![
            bug(1, "a", Status::New, Severity::Low),
            bug(2, "b", Status::Resolved, Severity::Low),
            bug(3, "c", Status::New, Severity::Low),
        ];
        let counts = status_counts(&bugs);
        assert_eq!(
            counts,
            vec![
                (Status::New, 2),
                (Status::InProgress, 0),
                (Status::Testing, 0),
                (Status::Resolved, 1),
                (Status::Closed, 0),
            ]
        );
    }

    #[test]
    fn severity_counts_zero_fill() {
        let bugs = vec![bug(1, "a", Status::New, Severity::Critical)];
        let counts = severity_counts(&bugs);
        assert_eq!(counts[0], (Severity::Low, 0));
        assert_eq!(counts[3], (Severity::Critical, 1));
    }

    #[test]
    fn progress_percent_policy() {
        assert!((progress_percent(50, 100) - 50.0).abs() < f64::EPSILON);
        assert!((progress_percent(0, 100) - 0.0).abs() < f64::EPSILON);
        // Degenerate target: defined as 0, never NaN or infinity.
        let degenerate = progress_percent(7, 0);
        assert!((degenerate - 0.0).abs() < f64::EPSILON);
        assert!(degenerate.is_finite());
        // Over-achieved bounties exceed 100 unclamped.
        assert!((progress_percent(12, 10) - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn member_activity_attributes_resolutions() {
        let teams = vec![qa_team()];
        let mut tracked = bug(1, "assigned", Status::New, Severity::Medium);
        tracked.assignee = Some(MemberId(1));
        tracked.reported_by = "Alex Johnson".into();

        // Unresolved: reported counts, resolved does not.
        let rows = member_activity(std::slice::from_ref(&tracked), &teams);
        let jamie = rows.iter().find(|r| r.name == "Jamie Smith").unwrap();
        let alex = rows.iter().find(|r| r.name == "Alex Johnson").unwrap();
        assert_eq!((jamie.reported, jamie.resolved), (0, 0));
        assert_eq!((alex.reported, alex.resolved), (1, 0));

        tracked.status = Status::Resolved;
        let rows = member_activity(std::slice::from_ref(&tracked), &teams);
        let jamie = rows.iter().find(|r| r.name == "Jamie Smith").unwrap();
        assert_eq!(jamie.resolved, 1);
    }

    #[test]
    fn member_activity_routes_unmatched_names_to_unknown() {
        let teams = vec![qa_team()];
        let mut stray = bug(1, "stray", Status::New, Severity::Low);
        stray.reported_by = "External Vendor".into();

        let rows = member_activity(&[stray], &teams);
        let unknown = rows.last().unwrap();
        assert_eq!(unknown.name, UNKNOWN);
        assert_eq!(unknown.reported, 1);
    }

    #[test]
    fn top_performers_ranked_and_truncated() {
        let teams = vec![qa_team()];
        let mut a = bug(1, "a", Status::Resolved, Severity::Low);
        a.assignee = Some(MemberId(2));
        let mut b = bug(2, "b", Status::Closed, Severity::Low);
        b.assignee = Some(MemberId(2));
        let mut c = bug(3, "c", Status::Resolved, Severity::Low);
        c.assignee = Some(MemberId(1));

        let performers = top_performers(&[a, b, c], &teams, 1);
        assert_eq!(performers.len(), 1);
        assert_eq!(performers[0].name, "Alex Johnson");
        assert_eq!(performers[0].resolved, 2);
        assert_eq!(performers[0].reward, 20);
    }

    #[test]
    fn critical_issues_excludes_resolved_and_low() {
        let bugs = vec![
            bug(1, "low open", Status::New, Severity::Low),
            bug(2, "high open", Status::InProgress, Severity::High),
            bug(3, "critical open", Status::Testing, Severity::Critical),
            bug(4, "critical resolved", Status::Resolved, Severity::Critical),
        ];
        let issues = critical_issues(&bugs);
        let titles: Vec<&str> = issues.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["critical open", "high open"]);
    }

    #[test]
    fn cadence_progress_zero_fills_empty_groups() {
        let bounties = vec![Bounty {
            id: BountyId(1),
            title: "Fix 5 Frontend Bugs".into(),
            description: String::new(),
            deadline: chrono::NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            target: 5,
            current: 3,
            reward: "$50".into(),
            cadence: Cadence::Daily,
        }];
        let progress = cadence_progress(&bounties);
        assert_eq!(progress.len(), 3);
        assert!((progress[0].1 - 60.0).abs() < f64::EPSILON);
        assert!((progress[1].1 - 0.0).abs() < f64::EPSILON);
        assert!((progress[2].1 - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rewards_group_by_month_and_team() {
        let teams = vec![qa_team()];
        let entries = vec![
            RewardEntry {
                member: "Jamie Smith".into(),
                month: "Jan".into(),
                amount: 150,
            },
            RewardEntry {
                member: "Alex Johnson".into(),
                month: "Jan".into(),
                amount: 200,
            },
            RewardEntry {
                member: "Somebody Else".into(),
                month: "Feb".into(),
                amount: 50,
            },
        ];
        let months = team_rewards_by_month(&entries, &teams);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "Jan");
        assert_eq!(months[0].totals[0], ("QA Team".to_string(), 350));
        assert_eq!(months[1].totals[0], ("QA Team".to_string(), 0));
        assert_eq!(months[1].totals[1], (UNKNOWN.to_string(), 50));
    }
}
