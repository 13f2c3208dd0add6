//! Typed identifiers for every entity family.
//!
//! Ids are process-local `u32`s assigned by the owning store
//! (`max(existing) + 1`, starting at 1). Cross-entity references hold these
//! newtypes instead of display names, so renaming an entity never strands a
//! reference.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a tracked bug.
    BugId
);
id_newtype!(
    /// Identifier of a team.
    TeamId
);
id_newtype!(
    /// Identifier of a team member; unique across all teams.
    MemberId
);
id_newtype!(
    /// Identifier of a bug bucket (category).
    BucketId
);
id_newtype!(
    /// Identifier of a bounty.
    BountyId
);

#[cfg(test)]
mod tests {
    use super::{BugId, MemberId};

    #[test]
    fn ids_roundtrip_through_raw() {
        let id = BugId::from(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(u32::from(id), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = MemberId(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        assert_eq!(serde_json::from_str::<MemberId>("3").unwrap(), id);
    }
}
