use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::id::{MemberId, TeamId};
use crate::store::Record;

/// A member of a team. Owned by exactly one [`Team`]; member ids are unique
/// across the union of all teams' member lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub designation: String,
}

/// A team and its ordered member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: String,
    pub members: Vec<Member>,
}

impl Team {
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }
}

impl Record for Team {
    type Id = TeamId;

    const FAMILY: &'static str = "team";

    fn id(&self) -> TeamId {
        self.id
    }

    fn set_id(&mut self, raw: u32) {
        self.id = TeamId(raw);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            Err(ValidationError::new(Self::FAMILY, vec!["name"]))
        } else {
            Ok(())
        }
    }
}
