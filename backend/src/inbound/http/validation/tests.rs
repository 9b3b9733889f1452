//! Tests for the validating extractors.

use std::sync::OnceLock;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use regex::Regex;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::test_support::TestServices;

#[derive(Debug, Deserialize)]
struct Purchase {
    title: String,
    amount: AmountInput,
}

impl ValidatedPayload for Purchase {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new()
                .rule("title", Check::Required, "title is required")
                .rule("amount", Check::Required, "amount is required")
                .rule(
                    "amount",
                    Check::Range {
                        min: AMOUNT_MIN,
                        max: AMOUNT_MAX,
                    },
                    "amount must be a number between 0.01 and 1000000000",
                )
        })
    }
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

impl ValidatedPayload for MonthQuery {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new().rule(
                "month",
                Check::Pattern(Regex::new(r"^\d{4}-\d{2}$").expect("regex")),
                "month must be formatted as YYYY-MM",
            )
        })
    }
}

async fn purchase(Validated(body): Validated<Purchase>) -> Result<HttpResponse, Error> {
    let amount = body.amount.to_money("amount")?;
    Ok(HttpResponse::Ok().json(json!({"title": body.title, "cents": amount.cents()})))
}

async fn month(ValidatedQuery(query): ValidatedQuery<MonthQuery>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "month": query.month }))
}

async fn call(request: actix_test::TestRequest) -> (StatusCode, Value) {
    let services = TestServices::new();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(services.http_state()))
            .route("/purchase", web::post().to(purchase))
            .route("/month", web::get().to(month)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).expect("JSON body"))
}

#[rstest]
#[actix_web::test]
async fn valid_body_reaches_the_handler() {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/purchase")
            .set_json(json!({"title": "Lunch", "amount": "12.5"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"title": "Lunch", "cents": 1250}));
}

#[rstest]
#[actix_web::test]
async fn all_failures_are_reported_together() {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/purchase")
            .set_json(json!({"amount": "abc"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        json!([
            {"field": "title", "message": "title is required"},
            {"field": "amount", "message": "amount must be a number between 0.01 and 1000000000"},
        ])
    );
}

#[rstest]
#[actix_web::test]
async fn conversion_failures_use_the_validation_shape() {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/purchase")
            .set_json(json!({"title": "Lunch", "amount": "12.345"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "amount");
    assert_eq!(
        body["errors"][0]["message"],
        "amount may have at most two decimal places"
    );
}

#[rstest]
#[case(json!([1, 2]))]
#[case(json!("text"))]
#[actix_web::test]
async fn non_object_bodies_are_rejected(#[case] payload: Value) {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/purchase")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/purchase")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert!(body.get("errors").is_none());
}

#[rstest]
#[case("/month?month=2026-03", StatusCode::OK)]
#[case("/month", StatusCode::OK)]
#[case("/month?month=March", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn query_parameters_are_validated(#[case] uri: &str, #[case] expected: StatusCode) {
    let (status, _) = call(actix_test::TestRequest::get().uri(uri)).await;
    assert_eq!(status, expected);
}
