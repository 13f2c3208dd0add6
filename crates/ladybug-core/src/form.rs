//! Per-dialog form sessions.
//!
//! Each dialog owns one `FormSession<D>`: `Closed -> Open(draft)` on open,
//! then either `cancel` (discard, close) or `commit` (validate; close and
//! yield the draft on success, stay open with the error recorded on
//! failure). Field edits are free-form — validation happens only at commit
//! time. Sessions are independent: opening one dialog never disturbs
//! another.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::{FormError, ValidationError};
use crate::model::bounty::{Bounty, Cadence};
use crate::model::bucket::Bucket;
use crate::model::bug::{Bug, Severity, Status};
use crate::model::id::{BountyId, BucketId, BugId, MemberId, TeamId};
use crate::model::team::{Member, Team};

/// A transient, uncommitted field set for one create/edit dialog.
pub trait Draft {
    /// Family name used in validation errors.
    const FAMILY: &'static str;

    /// Commit-time required-field check.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Lifecycle controller for one dialog's draft.
#[derive(Debug, Clone, Default)]
pub struct FormSession<D: Draft> {
    draft: Option<D>,
    last_error: Option<ValidationError>,
}

impl<D: Draft> FormSession<D> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draft: None,
            last_error: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Open the session, seeding the draft (empty for create, populated for
    /// edit). Re-opening an already-open session replaces its draft.
    pub fn open(&mut self, draft: D) {
        debug!(family = D::FAMILY, "form opened");
        self.draft = Some(draft);
        self.last_error = None;
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&D> {
        self.draft.as_ref()
    }

    /// Mutable access to the draft fields; no validation happens here.
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        self.draft.as_mut()
    }

    /// Validate and close. On validation failure the session stays open and
    /// the error is retained for the notification line.
    pub fn commit(&mut self) -> Result<D, FormError> {
        let draft = self.draft.take().ok_or(FormError::Closed)?;
        match draft.validate() {
            Ok(()) => {
                debug!(family = D::FAMILY, "form committed");
                self.last_error = None;
                Ok(draft)
            }
            Err(err) => {
                debug!(family = D::FAMILY, error = %err, "form commit rejected");
                self.draft = Some(draft);
                self.last_error = Some(err.clone());
                Err(FormError::Invalid(err))
            }
        }
    }

    /// Discard the draft and close. Returns whether a session was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.draft.take().is_some();
        if was_open {
            debug!(family = D::FAMILY, "form cancelled");
        }
        self.last_error = None;
        was_open
    }

    /// The validation failure from the most recent rejected commit, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Draft for the "Report New Bug" dialog.
#[derive(Debug, Clone)]
pub struct BugDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub severity: Severity,
    pub bucket: Option<BucketId>,
    pub assignee: Option<MemberId>,
    pub reported_by: String,
}

impl Default for BugDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: Status::New,
            severity: Severity::Medium,
            bucket: None,
            assignee: None,
            reported_by: String::new(),
        }
    }
}

impl BugDraft {
    /// Seed an edit session from an existing bug.
    #[must_use]
    pub fn from_bug(bug: &Bug) -> Self {
        Self {
            title: bug.title.clone(),
            description: bug.description.clone(),
            status: bug.status,
            severity: bug.severity,
            bucket: Some(bug.bucket),
            assignee: bug.assignee,
            reported_by: bug.reported_by.clone(),
        }
    }

    /// Build the bug for `Store::create`; the store assigns id and stamps
    /// timestamps.
    #[must_use]
    pub fn into_bug(self) -> Bug {
        let now = Utc::now();
        Bug {
            id: BugId(0),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status,
            severity: self.severity,
            bucket: self.bucket.unwrap_or(BucketId(0)),
            assignee: self.assignee,
            reported_by: self.reported_by.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the draft's fields onto an existing bug (edit commit).
    pub fn apply_to(&self, bug: &mut Bug) {
        bug.title = self.title.trim().to_string();
        bug.description = self.description.trim().to_string();
        bug.status = self.status;
        bug.severity = self.severity;
        if let Some(bucket) = self.bucket {
            bug.bucket = bucket;
        }
        bug.assignee = self.assignee;
        bug.reported_by = self.reported_by.trim().to_string();
    }
}

impl Draft for BugDraft {
    const FAMILY: &'static str = "bug";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.bucket.is_none() {
            missing.push("bucket");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(Self::FAMILY, missing))
        }
    }
}

/// Draft for the "Create New Team" dialog.
#[derive(Debug, Clone, Default)]
pub struct TeamDraft {
    pub name: String,
    pub description: String,
}

impl TeamDraft {
    #[must_use]
    pub fn into_team(self) -> Team {
        Team {
            id: TeamId(0),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            members: Vec::new(),
        }
    }
}

impl Draft for TeamDraft {
    const FAMILY: &'static str = "team";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            Err(ValidationError::new(Self::FAMILY, vec!["name"]))
        } else {
            Ok(())
        }
    }
}

/// Draft for the "Add Team Member" dialog.
#[derive(Debug, Clone, Default)]
pub struct MemberDraft {
    pub name: String,
    pub designation: String,
    pub team: Option<TeamId>,
}

impl MemberDraft {
    /// Build the member with the id `AppState` hands out.
    #[must_use]
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            name: self.name.trim().to_string(),
            designation: self.designation.trim().to_string(),
        }
    }
}

impl Draft for MemberDraft {
    const FAMILY: &'static str = "member";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.designation.trim().is_empty() {
            missing.push("designation");
        }
        if self.team.is_none() {
            missing.push("team");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(Self::FAMILY, missing))
        }
    }
}

/// Draft for the "Create New Bucket" dialog.
#[derive(Debug, Clone, Default)]
pub struct BucketDraft {
    pub name: String,
    pub description: String,
    pub teams: Vec<TeamId>,
}

impl BucketDraft {
    #[must_use]
    pub fn into_bucket(self) -> Bucket {
        Bucket {
            id: BucketId(0),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            teams: self.teams,
        }
    }

    /// Toggle a team's membership in the assignment list (checkbox
    /// behavior).
    pub fn toggle_team(&mut self, team: TeamId) {
        if let Some(pos) = self.teams.iter().position(|&t| t == team) {
            self.teams.remove(pos);
        } else {
            self.teams.push(team);
        }
    }
}

impl Draft for BucketDraft {
    const FAMILY: &'static str = "bucket";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.teams.is_empty() {
            missing.push("teams");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(Self::FAMILY, missing))
        }
    }
}

/// Draft for the "Create New Bounty" dialog. `target` stays textual until
/// commit because it arrives from a free-text input.
#[derive(Debug, Clone)]
pub struct BountyDraft {
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub target: String,
    pub reward: String,
    pub cadence: Cadence,
}

impl Default for BountyDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            deadline: None,
            target: String::new(),
            reward: String::new(),
            cadence: Cadence::Daily,
        }
    }
}

impl BountyDraft {
    fn parsed_target(&self) -> Option<u32> {
        self.target.trim().parse().ok().filter(|&t| t > 0)
    }

    /// Build the bounty for `Store::create`. Progress starts at zero and
    /// the reward is normalized to a leading `$`.
    #[must_use]
    pub fn into_bounty(self) -> Bounty {
        let target = self.parsed_target().unwrap_or(0);
        let reward = {
            let trimmed = self.reward.trim();
            if trimmed.starts_with('$') {
                trimmed.to_string()
            } else {
                format!("${trimmed}")
            }
        };
        Bounty {
            id: BountyId(0),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            deadline: self.deadline.unwrap_or_default(),
            target,
            current: 0,
            reward,
            cadence: self.cadence,
        }
    }
}

impl Draft for BountyDraft {
    const FAMILY: &'static str = "bounty";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.deadline.is_none() {
            missing.push("deadline");
        }
        if self.parsed_target().is_none() {
            missing.push("target");
        }
        if self.reward.trim().is_empty() {
            missing.push("reward");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(Self::FAMILY, missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BountyDraft, BucketDraft, BugDraft, Draft, FormSession, MemberDraft, TeamDraft};
    use crate::error::FormError;
    use crate::model::bug::{Severity, Status};
    use crate::model::id::{BucketId, TeamId};
    use chrono::NaiveDate;

    fn valid_bug_draft() -> BugDraft {
        BugDraft {
            title: "Payment Processing Error".into(),
            description: "Payments are being processed twice for some users".into(),
            bucket: Some(BucketId(2)),
            ..BugDraft::default()
        }
    }

    #[test]
    fn session_starts_closed() {
        let session: FormSession<BugDraft> = FormSession::new();
        assert!(!session.is_open());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn commit_on_closed_session_is_an_error() {
        let mut session: FormSession<BugDraft> = FormSession::new();
        assert!(matches!(session.commit(), Err(FormError::Closed)));
    }

    #[test]
    fn open_commit_yields_draft_and_closes() {
        let mut session = FormSession::new();
        session.open(valid_bug_draft());
        assert!(session.is_open());

        let draft = session.commit().unwrap();
        assert_eq!(draft.title, "Payment Processing Error");
        assert!(!session.is_open());
    }

    #[test]
    fn failed_commit_keeps_session_open_with_error() {
        let mut session = FormSession::new();
        session.open(BugDraft::default());

        let err = session.commit().unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert!(session.is_open());
        let validation = session.last_error().unwrap();
        assert_eq!(validation.fields, vec!["title", "description", "bucket"]);

        // Fixing the fields lets the next commit succeed.
        if let Some(draft) = session.draft_mut() {
            *draft = valid_bug_draft();
        }
        assert!(session.commit().is_ok());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn cancel_discards_without_committing() {
        let mut session = FormSession::new();
        session.open(valid_bug_draft());
        assert!(session.cancel());
        assert!(!session.is_open());
        assert!(!session.cancel());
    }

    #[test]
    fn sessions_are_independent() {
        let mut bugs: FormSession<BugDraft> = FormSession::new();
        let mut teams: FormSession<TeamDraft> = FormSession::new();
        bugs.open(valid_bug_draft());
        teams.open(TeamDraft {
            name: "QA Team".into(),
            description: String::new(),
        });

        bugs.cancel();
        assert!(teams.is_open());
    }

    #[test]
    fn bug_draft_edit_roundtrip() {
        let mut bug = valid_bug_draft().into_bug();
        bug.status = Status::Testing;

        let mut draft = BugDraft::from_bug(&bug);
        draft.severity = Severity::Critical;
        draft.apply_to(&mut bug);

        assert_eq!(bug.status, Status::Testing);
        assert_eq!(bug.severity, Severity::Critical);
    }

    #[test]
    fn member_draft_requires_team() {
        let draft = MemberDraft {
            name: "Jordan Green".into(),
            designation: "Backend Developer".into(),
            team: None,
        };
        assert_eq!(draft.validate().unwrap_err().fields, vec!["team"]);
    }

    #[test]
    fn bucket_draft_toggles_teams() {
        let mut draft = BucketDraft::default();
        draft.toggle_team(TeamId(1));
        draft.toggle_team(TeamId(2));
        draft.toggle_team(TeamId(1));
        assert_eq!(draft.teams, vec![TeamId(2)]);
    }

    #[test]
    fn bounty_draft_validates_numeric_target() {
        let mut draft = BountyDraft {
            title: "Zero Critical Bugs".into(),
            deadline: Some(NaiveDate::from_ymd_opt(2023, 4, 28).unwrap()),
            target: "not a number".into(),
            reward: "500".into(),
            ..BountyDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err().fields, vec!["target"]);

        draft.target = "0".into();
        assert!(draft.validate().is_err());

        draft.target = "100".into();
        assert!(draft.validate().is_ok());

        let bounty = draft.into_bounty();
        assert_eq!(bounty.target, 100);
        assert_eq!(bounty.current, 0);
        assert_eq!(bounty.reward, "$500");
    }
}
