//! Savings goals.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Money, UserId};

/// Maximum goal name length in characters.
pub const GOAL_NAME_MAX: usize = 100;

/// Goal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalId(Uuid);

impl GoalId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated fields for a new goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    /// Label.
    pub name: String,
    /// Amount to save.
    pub target: Money,
    /// Optional target date.
    pub deadline: Option<NaiveDate>,
}

/// Savings goal and its progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    /// Identifier.
    pub id: GoalId,
    /// Owning user.
    pub owner: UserId,
    /// Label.
    pub name: String,
    /// Amount to save.
    pub target: Money,
    /// Amount saved so far.
    pub saved: Money,
    /// Optional target date.
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Start a goal with nothing saved.
    pub fn create(owner: UserId, draft: GoalDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: GoalId::random(),
            owner,
            name: draft.name,
            target: draft.target,
            saved: Money::ZERO,
            deadline: draft.deadline,
            created_at: now,
        }
    }

    /// Add a contribution.
    pub fn contribute(&mut self, amount: Money) {
        self.saved = self.saved + amount;
    }

    /// Whether the target has been reached.
    pub fn is_complete(&self) -> bool {
        self.saved >= self.target
    }

    /// Amount still to save.
    pub fn remaining(&self) -> Money {
        self.target.saturating_sub(self.saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn contributions_accumulate_until_complete() {
        let draft = GoalDraft {
            name: "Bike".to_owned(),
            target: Money::parse("300").expect("target"),
            deadline: None,
        };
        let mut goal = Goal::create(UserId::random(), draft, Utc::now());
        goal.contribute(Money::parse("120").expect("amount"));
        assert!(!goal.is_complete());
        assert_eq!(goal.remaining().to_string(), "180.00");

        goal.contribute(Money::parse("200").expect("amount"));
        assert!(goal.is_complete());
        assert_eq!(goal.remaining(), Money::ZERO);
    }
}
