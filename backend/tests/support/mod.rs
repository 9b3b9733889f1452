//! Shared helpers for HTTP integration tests.
//!
//! Integration tests compile as separate crates, so the helpers here build
//! the real application through the public API with fast, inspectable
//! collaborators: a fixed clock, a plain-text hasher and a notifier that
//! records delivered reset codes.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Arc, Mutex, PoisonError};

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::MockClock;
use serde_json::{Value, json};

use fintrack::domain::ports::{
    PasswordHasher, PasswordHasherError, ResetCodeDeliveryError, ResetCodeNotifier,
};
use fintrack::domain::{AccountSettings, EmailAddress, PasswordHash, ResetCode, TRACE_ID_HEADER};
use fintrack::inbound::http::health::HealthState;
use fintrack::server::{AppDependencies, Collaborators, build_app, build_http_state};

/// Instant every test request observes.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn fixed_clock() -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(now);
    clock
        .expect_local()
        .returning(|| now().with_timezone(&Local));
    clock
}

/// Stores passwords as `plain:<password>` so tests skip Argon2.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        Ok(hash.as_ref() == format!("plain:{password}"))
    }
}

/// Notifier remembering every delivered `(email, code)` pair.
#[derive(Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<(String, String)>>>);

impl Outbox {
    /// Last code delivered to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    /// Number of deliveries so far.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ResetCodeNotifier for Outbox {
    async fn deliver(
        &self,
        email: &EmailAddress,
        code: &ResetCode,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), ResetCodeDeliveryError> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((email.to_string(), code.expose().to_owned()));
        Ok(())
    }
}

/// Initialised application plus its reset-code outbox.
pub async fn spawn_app() -> (
    impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    Outbox,
) {
    let outbox = Outbox::default();
    let state = build_http_state(
        AccountSettings::default(),
        Collaborators {
            clock: Arc::new(fixed_clock()),
            hasher: Arc::new(PlainHasher),
            notifier: Arc::new(outbox.clone()),
        },
    );
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = test::init_service(build_app(AppDependencies {
        health_state: health,
        http_state: web::Data::new(state),
    }))
    .await;
    (app, outbox)
}

/// Response status, `trace-id` header and JSON body (`null` when empty).
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Value of the `trace-id` header.
    pub trace_id: Option<String>,
    /// Parsed body.
    pub body: Value,
}

/// Send `request` and capture the reply.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> Reply {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        trace_id,
        body,
    }
}

/// `Authorization` header for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Register `email` with `password` and log in, returning the token.
pub async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> String {
    let registered = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"fullName": "Test User", "email": email, "password": password})),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
    login(app, email, password)
        .await
        .body["token"]
        .as_str()
        .expect("token")
        .to_owned()
}

/// Attempt a login.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> Reply {
    send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password})),
    )
    .await
}
