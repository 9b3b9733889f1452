//! Monetary amounts held as integer minor units.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Errors returned by [`Money::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// The text is not a plain non-negative decimal number.
    #[error("amount must be a non-negative decimal number")]
    NotDecimal,
    /// More than two digits follow the decimal point.
    #[error("amount may have at most two decimal places")]
    TooPrecise,
    /// The amount does not fit the supported range.
    #[error("amount is too large")]
    Overflow,
}

/// Non-negative amount of money in cents.
///
/// # Examples
/// ```
/// use fintrack::domain::Money;
///
/// let amount = Money::parse("12.5").unwrap();
/// assert_eq!(amount.cents(), 1250);
/// assert_eq!(amount.to_string(), "12.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Build from a number of cents; negative values are rejected.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        if cents < 0 {
            return Err(MoneyError::NotDecimal);
        }
        Ok(Self(cents))
    }

    /// Parse a decimal string such as `"12"`, `"12.5"` or `"12.50"`.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let raw = raw.trim();
        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyError::NotDecimal);
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyError::NotDecimal);
        }
        if fraction.len() > 2 {
            return Err(MoneyError::TooPrecise);
        }

        let whole: i64 = whole.parse().map_err(|_| MoneyError::Overflow)?;
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyError::NotDecimal)? * 10,
            _ => fraction.parse().map_err(|_| MoneyError::NotDecimal)?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Amount in cents.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Difference, saturating at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Signed difference between two amounts, such as income minus expenses.
///
/// # Examples
/// ```
/// use fintrack::domain::{Balance, Money};
///
/// let income = Money::parse("10").unwrap();
/// let spent = Money::parse("12.5").unwrap();
/// assert_eq!(Balance::between(income, spent).to_string(), "-2.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(i64);

impl Balance {
    /// `credit - debit`.
    pub fn between(credit: Money, debit: Money) -> Self {
        Self(credit.0.saturating_sub(debit.0))
    }

    /// Balance in cents.
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}
