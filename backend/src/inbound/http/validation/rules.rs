//! Declarative field rules and the interpreter that evaluates them.
//!
//! A [`RuleSet`] is an ordered list of `(field, check, message)` triples.
//! [`RuleSet::evaluate`] runs every rule against a JSON object and returns
//! one [`FieldError`] per failing rule; nothing short-circuits.
//!
//! Only [`Check::Required`] looks at missing values. Every other check
//! passes when the field is absent, `null` or a blank string, so optional
//! fields may be omitted and a missing required field produces exactly one
//! error.

use chrono::{DateTime, NaiveDate, TimeDelta};
use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::{FieldError, email_regex};

/// Custom predicate over a field value and the whole payload.
pub type Predicate = fn(&Value, &Map<String, Value>) -> bool;

/// Constraint attached to one field.
pub enum Check {
    /// The field is present, non-null and not blank.
    Required,
    /// A string whose character count lies in `min..=max`.
    Length {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
    /// A JSON number or numeric string within `min..=max`.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// A string equal to one of the listed values.
    OneOf(&'static [&'static str]),
    /// A string matching the regular expression.
    Pattern(Regex),
    /// A string shaped like an email address.
    Email,
    /// A calendar date (`YYYY-MM-DD` or RFC 3339), optionally no more than
    /// `max_future_days` after today.
    Date {
        /// Furthest allowed distance into the future, in days.
        max_future_days: Option<i64>,
    },
    /// A caller supplied predicate.
    Custom(Predicate),
}

/// One field constraint with its rejection message.
pub struct Rule {
    field: &'static str,
    check: Check,
    message: String,
}

impl Rule {
    /// Field the rule applies to.
    pub fn field(&self) -> &'static str {
        self.field
    }

    fn passes(&self, body: &Map<String, Value>, today: NaiveDate) -> bool {
        let value = body.get(self.field).filter(|value| is_present(value));
        let Some(value) = value else {
            return !matches!(self.check, Check::Required);
        };
        match &self.check {
            Check::Required => true,
            Check::Length { min, max } => value
                .as_str()
                .is_some_and(|text| (*min..=*max).contains(&text.chars().count())),
            Check::Range { min, max } => {
                numeric_value(value).is_some_and(|number| (*min..=*max).contains(&number))
            }
            Check::OneOf(allowed) => value.as_str().is_some_and(|text| allowed.contains(&text)),
            Check::Pattern(pattern) => value.as_str().is_some_and(|text| pattern.is_match(text)),
            Check::Email => value
                .as_str()
                .is_some_and(|text| email_regex().is_match(text.trim())),
            Check::Date { max_future_days } => value
                .as_str()
                .and_then(parse_calendar_date)
                .is_some_and(|date| {
                    max_future_days.is_none_or(|days| date <= today + TimeDelta::days(days))
                }),
            Check::Custom(predicate) => predicate(value, body),
        }
    }
}

/// Ordered rules for one payload type.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use fintrack::inbound::http::validation::{Check, RuleSet};
/// use serde_json::json;
///
/// let rules = RuleSet::new()
///     .rule("title", Check::Required, "title is required")
///     .rule("title", Check::Length { min: 1, max: 5 }, "title is too long");
/// let body = json!({"title": "groceries"});
/// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
///
/// let errors = rules.evaluate(body.as_object().unwrap(), today);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].message, "title is too long");
/// ```
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, field: &'static str, check: Check, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            field,
            check,
            message: message.into(),
        });
        self
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule against `body`, in order, collecting each failure.
    pub fn evaluate(&self, body: &Map<String, Value>, today: NaiveDate) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter(|rule| !rule.passes(body, today))
            .map(|rule| FieldError::new(rule.field, rule.message.clone()))
            .collect()
    }
}

/// Whether a value counts as supplied.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}

/// Read a JSON number or a numeric string as `f64`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parse `YYYY-MM-DD`, falling back to the date part of an RFC 3339
/// timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
}
