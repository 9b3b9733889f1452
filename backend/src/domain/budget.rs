//! Monthly spending limits per category.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::domain::{Category, Money, UserId};

/// Error returned by [`BudgetMonth::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("month must be formatted as YYYY-MM")]
pub struct BudgetMonthError;

/// Calendar month a budget applies to.
///
/// # Examples
/// ```
/// use fintrack::domain::BudgetMonth;
///
/// let month: BudgetMonth = "2026-02".parse().unwrap();
/// assert_eq!(month.last_day().to_string(), "2026-02-28");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BudgetMonth {
    first_day: NaiveDate,
}

impl BudgetMonth {
    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// First day of the month.
    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    pub fn last_day(self) -> NaiveDate {
        let next = if self.first_day.month() == 12 {
            NaiveDate::from_ymd_opt(self.first_day.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.first_day.year(), self.first_day.month() + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(self.first_day)
    }

    /// Whether `date` falls inside the month.
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::containing(date) == self
    }
}

impl FromStr for BudgetMonth {
    type Err = BudgetMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or(BudgetMonthError)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(BudgetMonthError);
        }
        let year: i32 = year.parse().map_err(|_| BudgetMonthError)?;
        let month: u32 = month.parse().map_err(|_| BudgetMonthError)?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(BudgetMonthError)
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}

/// Budget identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetId(Uuid);

impl BudgetId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BudgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spending limit for one category in one month.
///
/// ## Invariants
/// - At most one budget per owner, category and month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    /// Identifier.
    pub id: BudgetId,
    /// Owning user.
    pub owner: UserId,
    /// Category the limit applies to.
    pub category: Category,
    /// Month the limit applies to.
    pub month: BudgetMonth,
    /// Spending limit.
    pub limit: Money,
}

/// Budget together with what was spent against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetUsage {
    /// The budget.
    pub budget: Budget,
    /// Expenses recorded in the category during the month.
    pub spent: Money,
    /// Limit minus spent, floored at zero.
    pub remaining: Money,
    /// Whether spending exceeded the limit.
    pub over_budget: bool,
}

impl BudgetUsage {
    /// Combine a budget with its spending.
    pub fn new(budget: Budget, spent: Money) -> Self {
        Self {
            remaining: budget.limit.saturating_sub(spent),
            over_budget: spent > budget.limit,
            budget,
            spent,
        }
    }
}
