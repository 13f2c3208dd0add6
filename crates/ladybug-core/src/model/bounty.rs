use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ValidationError;
use crate::model::bug::ParseEnumError;
use crate::model::id::BountyId;
use crate::store::Record;

/// The cadence a bounty is tracked over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Sprint,
}

impl Cadence {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Sprint];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Sprint => "sprint",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Sprint => "Sprint",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "sprint" => Ok(Self::Sprint),
            _ => Err(ParseEnumError {
                expected: "cadence",
                got: s.to_string(),
            }),
        }
    }
}

/// A goal-with-reward construct tracked over a daily/weekly/sprint cadence.
///
/// `current / target` drives the displayed progress percentage; `current`
/// is stored unclamped, clamping happens at display time only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: BountyId,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub target: u32,
    pub current: u32,
    /// Display currency string, normalized to a leading `$` on commit.
    pub reward: String,
    pub cadence: Cadence,
}

impl Bounty {
    /// Progress percentage, clamped to 0..=100 for display.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        crate::derive::progress_percent(self.current, self.target).clamp(0.0, 100.0)
    }
}

impl Record for Bounty {
    type Id = BountyId;

    const FAMILY: &'static str = "bounty";

    fn id(&self) -> BountyId {
        self.id
    }

    fn set_id(&mut self, raw: u32) {
        self.id = BountyId(raw);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.target == 0 {
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

/// One historical payout record. Member is kept by display name: payout
/// history can predate (or outlive) membership, so it never blocks a
/// member delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub member: String,
    /// Month label as shown on the rewards chart ("Jan", "Feb", ...).
    pub month: String,
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::{Bounty, BountyId, Cadence};
    use crate::store::Record;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn sample_bounty() -> Bounty {
        Bounty {
            id: BountyId(1),
            title: "Fix 5 Frontend Bugs".into(),
            description: "Close 5 frontend bugs by end of day".into(),
            deadline: NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            target: 5,
            current: 3,
            reward: "$50".into(),
            cadence: Cadence::Daily,
        }
    }

    #[test]
    fn cadence_roundtrips() {
        for value in Cadence::ALL {
            assert_eq!(Cadence::from_str(&value.to_string()).unwrap(), value);
        }
        assert!(Cadence::from_str("monthly").is_err());
    }

    #[test]
    fn progress_is_clamped_for_display() {
        let mut bounty = sample_bounty();
        assert!((bounty.progress_percent() - 60.0).abs() < f64::EPSILON);

        bounty.current = 12;
        assert!((bounty.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_target_is_invalid_but_never_divides() {
        let mut bounty = sample_bounty();
        bounty.target = 0;
        assert_eq!(bounty.validate().unwrap_err().fields, vec!["target"]);
        // Even an invalid record degrades to 0% rather than NaN.
        assert!((bounty.progress_percent() - 0.0).abs() < f64::EPSILON);
    }
}
