use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ValidationError;
use crate::model::id::{BucketId, BugId, MemberId};
use crate::store::Record;

/// The five lifecycle statuses of a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    New,
    InProgress,
    Testing,
    Resolved,
    Closed,
}

impl Status {
    /// All statuses in board-column order. Group counts zero-fill over this
    /// list so summary bars render deterministically.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::Testing,
        Self::Resolved,
        Self::Closed,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in-progress",
            Self::Testing => "testing",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Human display label ("In Progress" rather than "in-progress").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Testing => "Testing",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Whether this status counts as a completed resolution.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// Bug severity. Ordinal rank is `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities in ascending rank order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Ordinal rank used for severity sorting: Critical=4 down to Low=1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

/// A tracked bug.
///
/// `bucket` and `assignee` are typed id references resolved against the
/// bucket and team stores; `reported_by` stays a free-form name because
/// reporters are not required to be team members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub severity: Severity,
    pub bucket: BucketId,
    /// `None` means unassigned.
    pub assignee: Option<MemberId>,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Bug {
    type Id = BugId;

    const FAMILY: &'static str = "bug";

    fn id(&self) -> BugId {
        self.id
    }

    fn set_id(&mut self, raw: u32) {
        self.id = BugId(raw);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.bucket.raw() == 0 {
            missing.push("bucket");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(Self::FAMILY, missing))
        }
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        // Keeps the updated_at >= created_at invariant even if the caller's
        // clock went backwards between create and update.
        self.updated_at = now.max(self.created_at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "in-progress" | "in progress" | "inprogress" => Ok(Self::InProgress),
            "testing" => Ok(Self::Testing),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                expected: "severity",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bug, BucketId, BugId, Severity, Status};
    use crate::store::Record;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn sample_bug() -> Bug {
        let ts = Utc.with_ymd_and_hms(2023, 4, 10, 9, 0, 0).unwrap();
        Bug {
            id: BugId(1),
            title: "Login Authentication Bypass".into(),
            description: "Users can access protected routes without authentication".into(),
            status: Status::New,
            severity: Severity::High,
            bucket: BucketId(3),
            assignee: None,
            reported_by: "Jamie Smith".into(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        assert_eq!(
            serde_json::from_str::<Status>("\"resolved\"").unwrap(),
            Status::Resolved
        );
        assert_eq!(
            serde_json::from_str::<Severity>("\"low\"").unwrap(),
            Severity::Low
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in Status::ALL {
            let reparsed = Status::from_str(&value.to_string()).unwrap();
            assert_eq!(value, reparsed);
        }
        for value in Severity::ALL {
            let reparsed = Severity::from_str(&value.to_string()).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn status_parse_accepts_spaced_variant() {
        assert_eq!(Status::from_str("In Progress").unwrap(), Status::InProgress);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(Status::from_str("reopened").is_err());
        assert!(Severity::from_str("blocker").is_err());
    }

    #[test]
    fn severity_rank_is_ordered() {
        assert!(Severity::Critical.rank() > Severity::High.rank());
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Medium.rank() > Severity::Low.rank());
    }

    #[test]
    fn resolved_statuses() {
        assert!(Status::Resolved.is_resolved());
        assert!(Status::Closed.is_resolved());
        assert!(!Status::Testing.is_resolved());
    }

    #[test]
    fn validation_flags_missing_fields() {
        let mut bug = sample_bug();
        bug.title = "  ".into();
        bug.bucket = BucketId(0);
        let err = bug.validate().unwrap_err();
        assert_eq!(err.fields, vec!["title", "bucket"]);
    }

    #[test]
    fn stamp_updated_never_precedes_created() {
        let mut bug = sample_bug();
        let earlier = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();
        bug.stamp_updated(earlier);
        assert_eq!(bug.updated_at, bug.created_at);
    }
}
