//! The built-in sample dataset.
//!
//! Every page renders against this in-memory data; nothing persists across
//! a restart. Ids are pre-assigned and the stores continue above them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::model::bounty::{Bounty, Cadence, RewardEntry};
use crate::model::bucket::Bucket;
use crate::model::bug::{Bug, Severity, Status};
use crate::model::id::{BountyId, BucketId, BugId, MemberId, TeamId};
use crate::model::team::{Member, Team};
use crate::state::AppState;
use crate::store::Store;

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("seed timestamps are valid")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid")
}

fn member(id: u32, name: &str, designation: &str) -> Member {
    Member {
        id: MemberId(id),
        name: name.into(),
        designation: designation.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn bug(
    id: u32,
    title: &str,
    description: &str,
    status: Status,
    severity: Severity,
    bucket: u32,
    assignee: Option<u32>,
    reported_by: &str,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Bug {
    Bug {
        id: BugId(id),
        title: title.into(),
        description: description.into(),
        status,
        severity,
        bucket: BucketId(bucket),
        assignee: assignee.map(MemberId),
        reported_by: reported_by.into(),
        created_at: created,
        updated_at: updated,
    }
}

fn reward(member: &str, month: &str, amount: u32) -> RewardEntry {
    RewardEntry {
        member: member.into(),
        month: month.into(),
        amount,
    }
}

/// Build the full sample state: two teams, seven buckets, five bugs, six
/// bounties, and four months of reward history.
#[must_use]
pub fn sample() -> AppState {
    let teams = vec![
        Team {
            id: TeamId(1),
            name: "QA Team".into(),
            description: "Quality Assurance specialists".into(),
            members: vec![
                member(1, "Jamie Smith", "Senior QA"),
                member(2, "Alex Johnson", "QA Engineer"),
                member(3, "Casey Wilson", "QA Analyst"),
            ],
        },
        Team {
            id: TeamId(2),
            name: "Tech Team".into(),
            description: "Development and engineering".into(),
            members: vec![
                member(4, "Morgan Lee", "Senior Developer"),
                member(5, "Taylor Brown", "Full Stack Developer"),
                member(6, "Jordan Green", "Backend Developer"),
            ],
        },
    ];

    let buckets = vec![
        Bucket {
            id: BucketId(1),
            name: "Frontend Issues".into(),
            description: "UI/UX and client-side problems".into(),
            teams: vec![TeamId(2)],
        },
        Bucket {
            id: BucketId(2),
            name: "Backend Issues".into(),
            description: "Server-side and API problems".into(),
            teams: vec![TeamId(2)],
        },
        Bucket {
            id: BucketId(3),
            name: "Security".into(),
            description: "Authentication, authorization, and data exposure".into(),
            teams: vec![TeamId(1), TeamId(2)],
        },
        Bucket {
            id: BucketId(4),
            name: "Functional Testing".into(),
            description: "Feature testing and validation".into(),
            teams: vec![TeamId(1)],
        },
        Bucket {
            id: BucketId(5),
            name: "Performance Issues".into(),
            description: "Speed and optimization problems".into(),
            teams: vec![TeamId(1), TeamId(2)],
        },
        Bucket {
            id: BucketId(6),
            name: "UI/UX".into(),
            description: "Layout, styling, and interaction polish".into(),
            teams: vec![TeamId(2)],
        },
        Bucket {
            id: BucketId(7),
            name: "Cross-platform".into(),
            description: "Behavior differences between platforms".into(),
            teams: vec![TeamId(1), TeamId(2)],
        },
    ];

    let bugs = vec![
        bug(
            1,
            "Login Authentication Bypass",
            "Users can access protected routes without authentication",
            Status::New,
            Severity::High,
            3,
            Some(1),
            "Alex Johnson",
            ts(2023, 4, 10),
            ts(2023, 4, 10),
        ),
        bug(
            2,
            "Payment Processing Error",
            "Payments are being processed twice for some users",
            Status::InProgress,
            Severity::High,
            2,
            Some(2),
            "Jamie Smith",
            ts(2023, 4, 8),
            ts(2023, 4, 11),
        ),
        bug(
            3,
            "Missing Validation on Form Fields",
            "Form submission allows invalid data formats",
            Status::Testing,
            Severity::Medium,
            1,
            Some(3),
            "Casey Wilson",
            ts(2023, 4, 5),
            ts(2023, 4, 12),
        ),
        bug(
            4,
            "Mobile Layout Broken on Small Screens",
            "UI elements overlap on screens below 320px width",
            Status::Resolved,
            Severity::Low,
            6,
            Some(4),
            "Jamie Smith",
            ts(2023, 4, 1),
            ts(2023, 4, 13),
        ),
        bug(
            5,
            "Data Synchronization Issue",
            "Changes made on mobile don't sync with web app",
            Status::Closed,
            Severity::Medium,
            7,
            Some(5),
            "External QA Vendor",
            ts(2023, 3, 28),
            ts(2023, 4, 9),
        ),
    ];

    let bounties = vec![
        Bounty {
            id: BountyId(1),
            title: "Fix 5 Frontend Bugs".into(),
            description: "Close 5 frontend bugs by end of day".into(),
            deadline: date(2023, 4, 15),
            target: 5,
            current: 3,
            reward: "$50".into(),
            cadence: Cadence::Daily,
        },
        Bounty {
            id: BountyId(2),
            title: "Complete Code Reviews".into(),
            description: "Review 10 PRs by end of day".into(),
            deadline: date(2023, 4, 15),
            target: 10,
            current: 8,
            reward: "$70".into(),
            cadence: Cadence::Daily,
        },
        Bounty {
            id: BountyId(3),
            title: "Refactor Authentication".into(),
            description: "Complete the auth module refactoring".into(),
            deadline: date(2023, 4, 18),
            target: 100,
            current: 65,
            reward: "$150".into(),
            cadence: Cadence::Weekly,
        },
        Bounty {
            id: BountyId(4),
            title: "Performance Optimization".into(),
            description: "Improve loading times by 30%".into(),
            deadline: date(2023, 4, 18),
            target: 100,
            current: 42,
            reward: "$200".into(),
            cadence: Cadence::Weekly,
        },
        Bounty {
            id: BountyId(5),
            title: "Zero Critical Bugs".into(),
            description: "Close all critical bugs by sprint end".into(),
            deadline: date(2023, 4, 28),
            target: 100,
            current: 82,
            reward: "$500".into(),
            cadence: Cadence::Sprint,
        },
        Bounty {
            id: BountyId(6),
            title: "Feature Completion".into(),
            description: "Complete all planned features for the release".into(),
            deadline: date(2023, 4, 28),
            target: 100,
            current: 74,
            reward: "$600".into(),
            cadence: Cadence::Sprint,
        },
    ];

    let rewards = vec![
        reward("Jamie Smith", "Jan", 150),
        reward("Jamie Smith", "Feb", 200),
        reward("Jamie Smith", "Mar", 250),
        reward("Jamie Smith", "Apr", 300),
        reward("Alex Johnson", "Jan", 200),
        reward("Alex Johnson", "Feb", 150),
        reward("Alex Johnson", "Mar", 300),
        reward("Alex Johnson", "Apr", 200),
        reward("Casey Wilson", "Jan", 180),
        reward("Casey Wilson", "Feb", 220),
        reward("Casey Wilson", "Mar", 180),
        reward("Casey Wilson", "Apr", 200),
        reward("Morgan Lee", "Jan", 210),
        reward("Morgan Lee", "Feb", 180),
        reward("Morgan Lee", "Mar", 230),
        reward("Morgan Lee", "Apr", 200),
    ];

    AppState {
        bugs: Store::with_records(bugs),
        teams: Store::with_records(teams),
        buckets: Store::with_records(buckets),
        bounties: Store::with_records(bounties),
        rewards,
    }
}

#[cfg(test)]
mod tests {
    use super::sample;
    use crate::store::Record as _;

    #[test]
    fn seed_collections_are_populated() {
        let state = sample();
        assert_eq!(state.bugs.len(), 5);
        assert_eq!(state.teams.len(), 2);
        assert_eq!(state.buckets.len(), 7);
        assert_eq!(state.bounties.len(), 6);
        assert_eq!(state.rewards.len(), 16);
    }

    #[test]
    fn seed_records_all_validate() {
        let state = sample();
        for bug in &state.bugs {
            bug.validate().unwrap();
        }
        for team in &state.teams {
            team.validate().unwrap();
        }
        for bucket in &state.buckets {
            bucket.validate().unwrap();
        }
        for bounty in &state.bounties {
            bounty.validate().unwrap();
        }
    }

    #[test]
    fn seed_references_resolve() {
        let state = sample();
        for bug in &state.bugs {
            assert!(state.buckets.get(bug.bucket).is_some(), "bug {} bucket", bug.id);
            if let Some(assignee) = bug.assignee {
                assert!(state.member(assignee).is_some(), "bug {} assignee", bug.id);
            }
        }
        for bucket in &state.buckets {
            for team in &bucket.teams {
                assert!(state.teams.get(*team).is_some());
            }
        }
    }

    #[test]
    fn seed_timestamps_keep_the_invariant() {
        let state = sample();
        for bug in &state.bugs {
            assert!(bug.updated_at >= bug.created_at);
        }
    }

    #[test]
    fn created_entities_continue_above_seed_ids() {
        let mut state = sample();
        let draft = crate::form::TeamDraft {
            name: "Platform Team".into(),
            description: String::new(),
        };
        let id = state.teams.create(draft.into_team()).unwrap().id;
        assert_eq!(id.raw(), 3);
        assert_eq!(state.next_member_id().raw(), 7);
    }
}
