//! Rule fragments shared by several payloads.
//!
//! Each helper appends the rules for one kind of field to a [`RuleSet`] so
//! endpoints that accept the same kind of value report identical messages.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::{
    Category, FULL_NAME_MAX, FULL_NAME_MIN, PASSWORD_MAX, PASSWORD_MIN, is_letters_and_spaces,
    meets_password_composition,
};

use super::{AMOUNT_MAX, AMOUNT_MIN, Check, RuleSet};

fn letters_and_spaces(value: &Value, _: &Map<String, Value>) -> bool {
    value.as_str().is_some_and(is_letters_and_spaces)
}

fn strong_password(value: &Value, _: &Map<String, Value>) -> bool {
    value.as_str().is_some_and(meets_password_composition)
}

fn month_pattern() -> Regex {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$")
        .unwrap_or_else(|error| panic!("month regex failed to compile: {error}"))
}

/// Pattern for a six digit one-time code.
pub fn otp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{6}$").unwrap_or_else(|error| panic!("otp regex failed to compile: {error}"))
    })
}

/// `field` must be present.
pub fn required(rules: RuleSet, field: &'static str) -> RuleSet {
    rules.rule(field, Check::Required, format!("{field} is required"))
}

/// `field` must be a well formed email address.
pub fn email(rules: RuleSet, field: &'static str) -> RuleSet {
    required(rules, field).rule(
        field,
        Check::Email,
        format!("{field} must be a valid email address"),
    )
}

/// Full name constraints; `required` adds the presence rule.
pub fn full_name(rules: RuleSet, field: &'static str, required_field: bool) -> RuleSet {
    let rules = if required_field {
        required(rules, field)
    } else {
        rules
    };
    rules
        .rule(
            field,
            Check::Length {
                min: FULL_NAME_MIN,
                max: FULL_NAME_MAX,
            },
            format!("{field} must be between {FULL_NAME_MIN} and {FULL_NAME_MAX} characters"),
        )
        .rule(
            field,
            Check::Custom(letters_and_spaces),
            format!("{field} may only contain letters and spaces"),
        )
}

/// Password strength policy for new passwords.
pub fn new_password(rules: RuleSet, field: &'static str) -> RuleSet {
    required(rules, field)
        .rule(
            field,
            Check::Length {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            },
            format!("{field} must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"),
        )
        .rule(
            field,
            Check::Custom(strong_password),
            format!("{field} must contain a lowercase letter, an uppercase letter and a digit"),
        )
}

/// Required monetary amount within the accepted range.
pub fn amount(rules: RuleSet, field: &'static str) -> RuleSet {
    required(rules, field).rule(
        field,
        Check::Range {
            min: AMOUNT_MIN,
            max: AMOUNT_MAX,
        },
        format!("{field} must be a number between 0.01 and 1000000000"),
    )
}

/// Optional free text bounded to `max` characters.
pub fn bounded_text(rules: RuleSet, field: &'static str, min: usize, max: usize) -> RuleSet {
    let message = if min > 0 {
        format!("{field} must be between {min} and {max} characters")
    } else {
        format!("{field} must be at most {max} characters")
    };
    rules.rule(field, Check::Length { min, max }, message)
}

/// Category from the fixed set.
pub fn category(rules: RuleSet, field: &'static str) -> RuleSet {
    rules.rule(
        field,
        Check::OneOf(Category::NAMES),
        format!("{field} must be one of: {}", Category::NAMES.join(", ")),
    )
}

/// Calendar month as `YYYY-MM`.
pub fn month(rules: RuleSet, field: &'static str) -> RuleSet {
    rules.rule(
        field,
        Check::Pattern(month_pattern()),
        format!("{field} must be formatted as YYYY-MM"),
    )
}

/// Calendar date, optionally bounded into the future.
pub fn date(rules: RuleSet, field: &'static str, max_future_days: Option<i64>) -> RuleSet {
    let message = match max_future_days {
        Some(days) => format!("{field} must be a valid date no more than {days} days in the future"),
        None => format!("{field} must be a valid date"),
    };
    rules.rule(field, Check::Date { max_future_days }, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    fn messages(rules: &RuleSet, body: Value) -> Vec<String> {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).expect("date");
        let Value::Object(body) = body else {
            panic!("expected object");
        };
        rules
            .evaluate(&body, today)
            .into_iter()
            .map(|err| err.message)
            .collect()
    }

    #[rstest]
    #[case("password", vec!["password must contain a lowercase letter, an uppercase letter and a digit"])]
    #[case("Sh0rt", vec!["password must be between 8 and 128 characters"])]
    #[case("Secur3Pass", vec![])]
    fn password_policy(#[case] password: &str, #[case] expected: Vec<&str>) {
        let rules = new_password(RuleSet::new(), "password");
        assert_eq!(messages(&rules, json!({ "password": password })), expected);
    }

    #[rstest]
    #[case("Ada Lovelace", 0)]
    #[case("A", 1)]
    #[case("R2-D2", 1)]
    fn full_name_rules(#[case] name: &str, #[case] failures: usize) {
        let rules = full_name(RuleSet::new(), "fullName", true);
        assert_eq!(messages(&rules, json!({ "fullName": name })).len(), failures);
    }

    #[rstest]
    fn optional_full_name_may_be_omitted() {
        let rules = full_name(RuleSet::new(), "fullName", false);
        assert!(messages(&rules, json!({})).is_empty());
    }

    #[rstest]
    #[case("2026-03", true)]
    #[case("2026-13", false)]
    #[case("26-03", false)]
    #[case("\u{0662}\u{0660}\u{0662}\u{0666}-03", false)]
    fn month_shape(#[case] value: &str, #[case] accepted: bool) {
        let rules = month(RuleSet::new(), "month");
        assert_eq!(messages(&rules, json!({ "month": value })).is_empty(), accepted);
    }

    #[rstest]
    #[case("123456", true)]
    #[case("12345", false)]
    #[case("12a456", false)]
    #[case("\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}", false)]
    #[case("\u{FF11}23456", false)]
    fn otp_shape(#[case] value: &str, #[case] accepted: bool) {
        assert_eq!(otp_pattern().is_match(value), accepted);
    }
}
