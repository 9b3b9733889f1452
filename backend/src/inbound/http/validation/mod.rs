//! Request validation for inbound HTTP adapters.
//!
//! Payload types implement [`ValidatedPayload`] to declare their rules.
//! Handlers then take [`Validated<T>`] (JSON bodies) or
//! [`ValidatedQuery<T>`] (query strings); the extractor evaluates every rule
//! and answers `400 Validation failed` with the full error list before the
//! handler runs. Bodies reach the extractor already sanitised by
//! [`crate::inbound::http::sanitize::Sanitize`].

pub mod fields;
mod rules;

use std::collections::HashMap;
use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::NaiveDate;
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Error, FieldError, Money};

use super::state::HttpState;

pub use rules::{Check, Predicate, Rule, RuleSet, numeric_value, parse_calendar_date};

/// Smallest accepted monetary amount.
pub const AMOUNT_MIN: f64 = 0.01;
/// Largest accepted monetary amount.
pub const AMOUNT_MAX: f64 = 1_000_000_000.0;
/// How far into the future a transaction date may lie.
pub const MAX_FUTURE_DAYS: i64 = 365;

/// Request payload with a declared rule set.
pub trait ValidatedPayload: DeserializeOwned {
    /// Rules evaluated before deserialisation.
    fn rules() -> &'static RuleSet;
}

/// Run `T`'s rules against `body` and deserialise it when they all pass.
pub fn validate_value<T: ValidatedPayload>(body: Value, today: NaiveDate) -> Result<T, Error> {
    let Value::Object(fields) = body else {
        return Err(Error::validation(vec![FieldError::new(
            "body",
            "request body must be a JSON object",
        )]));
    };
    let errors = T::rules().evaluate(&fields, today);
    if !errors.is_empty() {
        debug!(failures = errors.len(), "request failed validation");
        return Err(Error::validation(errors));
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| Error::validation(vec![FieldError::new("body", err.to_string())]))
}

/// Wrap a domain conversion failure on one field in the validation shape.
pub fn field_error(field: &str, error: impl ToString) -> Error {
    Error::validation(vec![FieldError::new(field, error.to_string())])
}

/// Parse an identifier taken from the path.
///
/// A malformed id cannot name an existing resource, so it is reported as
/// `not_found` with `missing` as the message.
pub fn path_uuid(raw: &str, missing: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found(missing))
}

fn today(req: &HttpRequest) -> Result<NaiveDate, Error> {
    req.app_data::<web::Data<HttpState>>()
        .map(|state| state.clock.utc().date_naive())
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

/// JSON body that passed its rule set.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ValidatedPayload + 'static> FromRequest for Validated<T> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        let today = today(req);
        Box::pin(async move {
            let today = today?;
            let web::Json(body) = body.await.map_err(|err| {
                debug!(error = %err, "rejected unreadable JSON body");
                Error::invalid_request("request body must be valid JSON")
            })?;
            validate_value(body, today).map(Validated)
        })
    }
}

/// Query string that passed its rule set.
///
/// Every parameter reaches the rules as a JSON string.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> ValidatedQuery<T> {
    /// Unwrap the parameters.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: ValidatedPayload + 'static> FromRequest for ValidatedQuery<T> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = today(req).and_then(|today| {
            let params =
                web::Query::<HashMap<String, String>>::from_query(req.query_string())
                    .map_err(|_| Error::invalid_request("query string is malformed"))?
                    .into_inner();
            let fields: Map<String, Value> = params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            validate_value(Value::Object(fields), today).map(ValidatedQuery)
        });
        Box::pin(async move { result })
    }
}

/// Monetary amount accepted as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// `12.5`
    Number(serde_json::Number),
    /// `"12.50"`
    Text(String),
}

impl AmountInput {
    /// Convert to [`Money`], reporting failures against `field`.
    pub fn to_money(&self, field: &str) -> Result<Money, Error> {
        let text = match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        };
        Money::parse(&text).map_err(|err| field_error(field, err))
    }
}

#[cfg(test)]
mod tests;
