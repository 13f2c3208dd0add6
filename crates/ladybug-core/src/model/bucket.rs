use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::id::{BucketId, TeamId};
use crate::store::Record;

/// A named category used to classify bugs, assigned to one or more teams.
///
/// Team assignment is a plain id list, not ownership; the delete policy in
/// `state.rs` keeps the references from dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
    pub description: String,
    pub teams: Vec<TeamId>,
}

impl Bucket {
    #[must_use]
    pub fn is_assigned_to(&self, team: TeamId) -> bool {
        self.teams.contains(&team)
    }
}

impl Record for Bucket {
    type Id = BucketId;

    const FAMILY: &'static str = "bucket";

    fn id(&self) -> BucketId {
        self.id
    }

    fn set_id(&mut self, raw: u32) {
        self.id = BucketId(raw);
    }

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

#[cfg(test)]
mod tests {
    use super::{Bucket, BucketId, TeamId};
    use crate::store::Record;

    #[test]
    fn validation_requires_name_and_a_team() {
        let bucket = Bucket {
            id: BucketId(0),
            name: String::new(),
            description: "Server-side and API problems".into(),
            teams: Vec::new(),
        };
        assert_eq!(
            bucket.validate().unwrap_err().fields,
            vec!["name", "teams"]
        );
    }

    #[test]
    fn assignment_check() {
        let bucket = Bucket {
            id: BucketId(1),
            name: "Backend Issues".into(),
            description: String::new(),
            teams: vec![TeamId(2)],
        };
        assert!(bucket.is_assigned_to(TeamId(2)));
        assert!(!bucket.is_assigned_to(TeamId(1)));
    }
}
