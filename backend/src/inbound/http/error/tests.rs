//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{Error, FieldError};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("repository exploded")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

async fn body_json(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, trace_header, body)
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let (status, trace_header, body) = body_json(&internal_error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trace_header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn validation_errors_list_every_field() {
    let error = Error::validation(vec![
        FieldError::new("title", "title is required"),
        FieldError::new("category", "category must be one of: food, other"),
    ]);

    let (status, trace_header, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(trace_header.is_none());
    assert_eq!(
        body,
        json!({
            "code": "invalid_request",
            "message": "Validation failed",
            "errors": [
                {"field": "title", "message": "title is required"},
                {"field": "category", "message": "category must be one of: food, other"},
            ],
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details() {
    let error = Error::conflict("email already registered").with_details(json!({"field": "email"}));

    let (status, _, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"], json!({"field": "email"}));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[rstest]
#[actix_web::test]
async fn unauthorized_responses_advertise_the_bearer_scheme() {
    let response = ResponseError::error_response(&Error::unauthorized("login required"));

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(actix_web::http::header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
}
