//! Income and expense records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Money, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum vendor length in characters.
pub const VENDOR_MAX: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 500;

/// Error returned when parsing an unknown category or kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownVariant {
    what: &'static str,
    value: String,
}

macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($what:literal) {
            $( $(#[$meta:meta])* $variant:ident => $text:literal ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$meta])* $variant, )*
        }

        impl $name {
            /// Every variant's wire name, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($text),*];

            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Wire name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )*
                    other => Err(UnknownVariant { what: $what, value: other.to_owned() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Spending or income category.
    pub enum Category("category") {
        /// Groceries and eating out.
        Food => "food",
        /// Fuel, fares and vehicle costs.
        Transport => "transport",
        /// Rent, mortgage and home costs.
        Housing => "housing",
        /// Energy, water, phone and internet.
        Utilities => "utilities",
        /// Leisure.
        Entertainment => "entertainment",
        /// Medical and fitness.
        Health => "health",
        /// Retail purchases.
        Shopping => "shopping",
        /// Courses, books and tuition.
        Education => "education",
        /// Wages.
        Salary => "salary",
        /// Returns and investment flows.
        Investment => "investment",
        /// Anything else.
        Other => "other",
    }
}

string_enum! {
    /// Direction of a transaction.
    pub enum TransactionKind("transaction kind") {
        /// Money coming in.
        Income => "income",
        /// Money going out.
        Expense => "expense",
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        Self::Expense
    }
}

/// Transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated user-supplied transaction fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Short label.
    pub title: String,
    /// Positive amount.
    pub amount: Money,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Category.
    pub category: Category,
    /// Calendar date the money moved.
    pub date: NaiveDate,
    /// Merchant or payer.
    pub vendor: Option<String>,
    /// Free text notes.
    pub description: Option<String>,
}

/// Stored transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Identifier.
    pub id: TransactionId,
    /// Owning user.
    pub owner: UserId,
    /// Short label.
    pub title: String,
    /// Positive amount.
    pub amount: Money,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Category.
    pub category: Category,
    /// Calendar date the money moved.
    pub date: NaiveDate,
    /// Merchant or payer.
    pub vendor: Option<String>,
    /// Free text notes.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Materialise a new transaction from a draft.
    pub fn create(owner: UserId, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        let TransactionDraft {
            title,
            amount,
            kind,
            category,
            date,
            vendor,
            description,
        } = draft;
        Self {
            id: TransactionId::random(),
            owner,
            title,
            amount,
            kind,
            category,
            date,
            vendor,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the user-editable fields.
    pub fn apply(&mut self, draft: TransactionDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.amount = draft.amount;
        self.kind = draft.kind;
        self.category = draft.category;
        self.date = draft.date;
        self.vendor = draft.vendor;
        self.description = draft.description;
        self.updated_at = now;
    }
}

/// Listing filters; every field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only this category.
    pub category: Option<Category>,
    /// Only this kind.
    pub kind: Option<TransactionKind>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.category.is_none_or(|c| c == transaction.category)
            && self.kind.is_none_or(|k| k == transaction.kind)
            && self.from.is_none_or(|from| transaction.date >= from)
            && self.to.is_none_or(|to| transaction.date <= to)
    }
}
