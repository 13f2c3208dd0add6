//! Top-level application state.
//!
//! `AppState` owns one store per entity family and is passed by reference
//! into the view controllers — there are no hidden singletons. Operations
//! that span stores (member id allocation, cascade/restrict delete rules)
//! live here rather than in the generic store.
//!
//! Delete policy:
//! - team: restricted while it has members or any bucket references it
//! - bucket: restricted while any bug references it
//! - member: cascades — bugs assigned to the member become unassigned
//! - bug, bounty: plain removal

use tracing::info;

use crate::error::StoreError;
use crate::form::MemberDraft;
use crate::model::bounty::{Bounty, RewardEntry};
use crate::model::bucket::Bucket;
use crate::model::bug::Bug;
use crate::model::id::{BucketId, BugId, MemberId, TeamId};
use crate::model::team::{Member, Team};
use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub bugs: Store<Bug>,
    pub teams: Store<Team>,
    pub buckets: Store<Bucket>,
    pub bounties: Store<Bounty>,
    /// Historical payout records; read-only in the UI.
    pub rewards: Vec<RewardEntry>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    /// Next member id: unique across the union of all teams' rosters.
    #[must_use]
    pub fn next_member_id(&self) -> MemberId {
        let max = self
            .teams
            .iter()
            .flat_map(|t| t.members.iter())
            .map(|m| m.id.raw())
            .max()
            .unwrap_or(0);
        MemberId(max + 1)
    }

    /// Add a member to the draft's team. The draft must already carry the
    /// target team id.
    pub fn add_member(&mut self, draft: MemberDraft) -> Result<MemberId, StoreError> {
        use crate::form::Draft as _;
        draft.validate()?;
        let team_id = draft.team.ok_or(StoreError::NotFound {
            family: "team",
            id: 0,
        })?;
        let member_id = self.next_member_id();
        let member = draft.into_member(member_id);
        self.teams.update(team_id, |team| team.members.push(member))?;
        info!(team = team_id.raw(), member = member_id.raw(), "member added");
        Ok(member_id)
    }

    /// Remove a member from its team, unassigning any bugs that pointed at
    /// them.
    pub fn remove_member(&mut self, team_id: TeamId, member_id: MemberId) -> Result<(), StoreError> {
        let team = self.teams.get(team_id).ok_or(StoreError::NotFound {
            family: "team",
            id: team_id.raw(),
        })?;
        if team.member(member_id).is_none() {
            return Err(StoreError::NotFound {
                family: "member",
                id: member_id.raw(),
            });
        }

        self.teams.update(team_id, |team| {
            team.members.retain(|m| m.id != member_id);
        })?;

        let orphaned: Vec<BugId> = self
            .bugs
            .iter()
            .filter(|b| b.assignee == Some(member_id))
            .map(|b| b.id)
            .collect();
        for bug_id in orphaned {
            self.bugs.update(bug_id, |bug| bug.assignee = None)?;
        }

        info!(team = team_id.raw(), member = member_id.raw(), "member removed");
        Ok(())
    }

    /// Find the member with `id` along with its owning team.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<(&Team, &Member)> {
        self.teams
            .iter()
            .find_map(|t| t.member(id).map(|m| (t, m)))
    }

    // -----------------------------------------------------------------------
    // Restricted deletes
    // -----------------------------------------------------------------------

    /// Delete a team. Restricted while the team still has members or is
    /// referenced by a bucket, so no reference is ever left dangling.
    pub fn delete_team(&mut self, id: TeamId) -> Result<(), StoreError> {
        let team = self.teams.get(id).ok_or(StoreError::NotFound {
            family: "team",
            id: id.raw(),
        })?;
        if !team.members.is_empty() {
            return Err(StoreError::DeleteRestricted {
                family: "team",
                id: id.raw(),
                reason: "team still has members",
            });
        }
        if self.buckets.iter().any(|b| b.is_assigned_to(id)) {
            return Err(StoreError::DeleteRestricted {
                family: "team",
                id: id.raw(),
                reason: "team is assigned to a bucket",
            });
        }
        self.teams.remove(id)?;
        Ok(())
    }

    /// Delete a bucket. Restricted while any bug references it.
    pub fn delete_bucket(&mut self, id: BucketId) -> Result<(), StoreError> {
        if self.buckets.get(id).is_none() {
            return Err(StoreError::NotFound {
                family: "bucket",
                id: id.raw(),
            });
        }
        if self.bugs.iter().any(|b| b.bucket == id) {
            return Err(StoreError::DeleteRestricted {
                family: "bucket",
                id: id.raw(),
                reason: "bucket is referenced by bugs",
            });
        }
        self.buckets.remove(id)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Display lookups
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn bucket_name(&self, id: BucketId) -> Option<&str> {
        self.buckets.get(id).map(|b| b.name.as_str())
    }

    #[must_use]
    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.teams.get(id).map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn member_name(&self, id: MemberId) -> Option<&str> {
        self.member(id).map(|(_, m)| m.name.as_str())
    }

    /// Assignee label for a bug row: member name or "Unassigned".
    #[must_use]
    pub fn assignee_label(&self, assignee: Option<MemberId>) -> &str {
        assignee
            .and_then(|id| self.member_name(id))
            .unwrap_or("Unassigned")
    }
}
