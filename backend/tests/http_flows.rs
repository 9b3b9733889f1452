//! End-to-end flows through the assembled application: sanitisation,
//! validation, bearer authentication and the ledger endpoints.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use support::{bearer, login, register_and_login, send, spawn_app};

const PASSWORD: &str = "Secur3Pass";

#[rstest]
#[actix_web::test]
async fn transaction_lifecycle() {
    let (app, _) = spawn_app().await;
    let token = register_and_login(&app, "ada@example.com", PASSWORD).await;

    let created = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "  <script>alert(1)</script><b>Lunch</b> ",
                "amount": "12.5",
                "category": "food",
                "date": "2026-03-13",
                "vendor": "Deli"
            })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["title"], "Lunch");
    assert_eq!(created.body["amount"], "12.50");
    assert_eq!(created.body["kind"], "expense");
    let id = created.body["id"].as_str().expect("id").to_owned();
    let uri = format!("/api/v1/transactions/{id}");

    let fetched = send(&app, TestRequest::get().uri(&uri).insert_header(bearer(&token))).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["vendor"], "Deli");

    let replaced = send(
        &app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "Team lunch",
                "amount": 30,
                "kind": "expense",
                "category": "food",
                "date": "2026-03-13"
            })),
    )
    .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["amount"], "30.00");
    assert!(replaced.body.get("vendor").is_none());

    let deleted = send(&app, TestRequest::delete().uri(&uri).insert_header(bearer(&token))).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = send(&app, TestRequest::get().uri(&uri).insert_header(bearer(&token))).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert!(gone.trace_id.is_some());
    assert_eq!(gone.body["traceId"].as_str(), gone.trace_id.as_deref());
}

#[rstest]
#[actix_web::test]
async fn validation_failures_share_one_shape() {
    let (app, _) = spawn_app().await;
    let token = register_and_login(&app, "ada@example.com", PASSWORD).await;

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "",
                "amount": 10,
                "category": "gadgets",
                "date": "2026-03-13"
            })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    insta::with_settings!({sort_maps => true}, {
        insta::assert_json_snapshot!(reply.body, {".traceId" => "[trace-id]"}, @r#"
        {
          "code": "invalid_request",
          "errors": [
            {
              "field": "title",
              "message": "title is required"
            },
            {
              "field": "category",
              "message": "category must be one of: food, transport, housing, utilities, entertainment, health, shopping, education, salary, investment, other"
            }
          ],
          "message": "Validation failed",
          "traceId": "[trace-id]"
        }
        "#);
    });
}

#[rstest]
#[actix_web::test]
async fn rejected_payloads_never_reach_the_handler() {
    let (app, _) = spawn_app().await;
    let token = register_and_login(&app, "ada@example.com", PASSWORD).await;

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "Rent",
                "amount": "abc",
                "category": "housing",
                "date": "2026-03-01"
            })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"].as_array().map(Vec::len), Some(1));
    assert_eq!(reply.body["errors"][0]["field"], "amount");

    let listed = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(listed.body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn registration_reports_the_password_composition_rule_once() {
    let (app, _) = spawn_app().await;

    let reply = send(
        &app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "password"
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["errors"],
        json!([{
            "field": "password",
            "message": "password must contain a lowercase letter, an uppercase letter and a digit"
        }])
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let (app, _) = spawn_app().await;
    register_and_login(&app, "ada@example.com", PASSWORD).await;

    let reply = send(
        &app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "fullName": "Ada Again",
            "email": "ADA@example.com",
            "password": PASSWORD
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn owners_cannot_see_each_others_records() {
    let (app, _) = spawn_app().await;
    let ada = register_and_login(&app, "ada@example.com", PASSWORD).await;
    let bob = register_and_login(&app, "bob@example.com", PASSWORD).await;

    let created = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&ada))
            .set_json(json!({"title": "Salary", "amount": 2500, "kind": "income",
                "category": "salary", "date": "2026-03-01"})),
    )
    .await;
    let uri = format!(
        "/api/v1/transactions/{}",
        created.body["id"].as_str().expect("id")
    );

    let peek = send(&app, TestRequest::get().uri(&uri).insert_header(bearer(&bob))).await;
    assert_eq!(peek.status, StatusCode::NOT_FOUND);
    let delete = send(&app, TestRequest::delete().uri(&uri).insert_header(bearer(&bob))).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
    let listed = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&bob)),
    )
    .await;
    assert_eq!(listed.body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn password_reset_flow() {
    let (app, outbox) = spawn_app().await;
    let old_token = register_and_login(&app, "ada@example.com", PASSWORD).await;

    let unknown = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({"email": "nobody@example.com"})),
    )
    .await;
    let known = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({"email": "ada@example.com"})),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::ACCEPTED);
    assert_eq!(known.status, StatusCode::ACCEPTED);
    assert_eq!(unknown.body, known.body);
    assert_eq!(outbox.len(), 1);
    let code = outbox.last_code_for("ada@example.com").expect("code");

    let reset = |otp: String| {
        TestRequest::post()
            .uri("/api/v1/auth/reset-password")
            .set_json(json!({"email": "ada@example.com", "otp": otp, "newPassword": "N3wSecret"}))
    };
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let rejected = send(&app, reset(wrong.to_owned())).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["message"], "invalid or expired reset code");

    let accepted = send(&app, reset(code.clone())).await;
    assert_eq!(accepted.status, StatusCode::NO_CONTENT);
    let reused = send(&app, reset(code)).await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);

    assert_eq!(
        login(&app, "ada@example.com", PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&app, "ada@example.com", "N3wSecret").await.status,
        StatusCode::OK
    );
    let revoked = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&old_token)),
    )
    .await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn dashboard_summarises_the_month() {
    let (app, _) = spawn_app().await;
    let token = register_and_login(&app, "ada@example.com", PASSWORD).await;
    let records = [
        json!({"title": "Salary", "amount": 3000, "kind": "income", "category": "salary", "date": "2026-03-01"}),
        json!({"title": "Rent", "amount": 1200, "category": "housing", "date": "2026-03-02"}),
        json!({"title": "Groceries", "amount": "230.25", "category": "food", "date": "2026-03-05"}),
        json!({"title": "Last month", "amount": 99, "category": "food", "date": "2026-02-27"}),
    ];
    for record in records {
        let reply = send(
            &app,
            TestRequest::post()
                .uri("/api/v1/transactions")
                .insert_header(bearer(&token))
                .set_json(record),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    }
    let budget = send(
        &app,
        TestRequest::put()
            .uri("/api/v1/budgets")
            .insert_header(bearer(&token))
            .set_json(json!({"category": "food", "month": "2026-03", "limit": 200})),
    )
    .await;
    assert_eq!(budget.status, StatusCode::OK);

    let summary = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/dashboard")
            .insert_header(bearer(&token)),
    )
    .await;

    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["month"], "2026-03");
    assert_eq!(summary.body["totalIncome"], "3000.00");
    assert_eq!(summary.body["totalExpenses"], "1430.25");
    assert_eq!(summary.body["balance"], "1569.75");
    assert_eq!(summary.body["spendingByCategory"][0]["category"], "housing");
    assert_eq!(summary.body["budgets"][0]["spent"], "230.25");
    assert_eq!(summary.body["budgets"][0]["overBudget"], true);
}

#[rstest]
#[actix_web::test]
async fn goals_accumulate_contributions() {
    let (app, _) = spawn_app().await;
    let token = register_and_login(&app, "ada@example.com", PASSWORD).await;

    let goal = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/goals")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Bike", "targetAmount": "100"})),
    )
    .await;
    assert_eq!(goal.status, StatusCode::CREATED);
    let uri = format!(
        "/api/v1/goals/{}/contributions",
        goal.body["id"].as_str().expect("id")
    );

    for _ in 0..2 {
        send(
            &app,
            TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&token))
                .set_json(json!({"amount": 50})),
        )
        .await;
    }

    let goals = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/goals")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(goals.body[0]["savedAmount"], "100.00");
    assert_eq!(goals.body[0]["completed"], true);
}

#[rstest]
#[case("/health/ready")]
#[case("/health/live")]
#[actix_web::test]
async fn health_checks_answer_without_authentication(#[case] path: &str) {
    let (app, _) = spawn_app().await;
    let reply = send(&app, TestRequest::get().uri(path)).await;
    assert_eq!(reply.status, StatusCode::OK);
}
