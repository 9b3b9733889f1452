//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"fullName":"Ada Lovelace","email":"ada@example.com","password":"Secur3Pass"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"Secur3Pass"}
//! POST /api/v1/auth/logout
//! GET /api/v1/users/me
//! PUT /api/v1/users/me {"fullName":"Ada King"}
//! ```

use std::sync::OnceLock;

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    EmailAddress, Error, FullName, IssuedSession, LoginCredentials, NewPassword,
    PROFILE_PHOTO_MAX, ProfilePhoto, ProfileUpdate, Registration, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RuleSet, Validated, ValidatedPayload, field_error, fields};

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Letters and spaces, 2 to 225 characters.
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    /// Login email; stored in lower case.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// 8 to 128 characters mixing lower case, upper case and digits.
    #[schema(example = "Secur3Pass")]
    pub password: String,
}

impl ValidatedPayload for RegisterRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::full_name(RuleSet::new(), "fullName", true);
            let rules = fields::email(rules, "email");
            fields::new_password(rules, "password")
        })
    }
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            full_name: FullName::new(&value.full_name).map_err(|e| field_error("fullName", e))?,
            email: EmailAddress::new(&value.email).map_err(|e| field_error("email", e))?,
            password: NewPassword::new(&value.password).map_err(|e| field_error("password", e))?,
        })
    }
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Account password.
    #[schema(example = "Secur3Pass")]
    pub password: String,
}

impl ValidatedPayload for LoginRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| fields::required(fields::email(RuleSet::new(), "email"), "password"))
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(|err| field_error("email", err))
    }
}

/// Profile update body for `PUT /api/v1/users/me`. Omitted fields keep
/// their current value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    /// New display name.
    #[schema(example = "Ada King")]
    pub full_name: Option<String>,
    /// Reference to a profile photo, at most 2048 characters.
    #[schema(example = "https://cdn.example.com/ada.png")]
    pub profile_photo: Option<String>,
}

impl ValidatedPayload for ProfileUpdateRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::full_name(RuleSet::new(), "fullName", false);
            fields::bounded_text(rules, "profilePhoto", 0, PROFILE_PHOTO_MAX)
        })
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl TryFrom<ProfileUpdateRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: ProfileUpdateRequest) -> Result<Self, Self::Error> {
        let full_name = supplied(value.full_name)
            .map(|name| FullName::new(name).map_err(|e| field_error("fullName", e)))
            .transpose()?;
        let profile_photo = supplied(value.profile_photo)
            .map(|photo| ProfilePhoto::new(photo).map_err(|e| field_error("profilePhoto", e)))
            .transpose()?;
        Ok(Self {
            full_name,
            profile_photo,
        })
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    /// Canonical email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Profile photo reference, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            full_name: profile.full_name.into(),
            email: profile.email.into(),
            profile_photo: profile.profile_photo.map(Into::into),
            created_at: profile.created_at,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Seconds until the token expires.
    #[schema(example = 3600)]
    pub expires_in: i64,
    /// Absolute expiry time.
    pub expires_at: DateTime<Utc>,
    /// The authenticated account.
    pub user: ProfileResponse,
}

impl From<IssuedSession> for LoginResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token.expose().to_owned(),
            expires_in: session.expires_in,
            expires_at: session.expires_at,
            user: session.user.into(),
        }
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: Validated<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let profile = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(profile)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: Validated<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session.into()))
}

/// Revoke the presented token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.accounts.logout(&caller.token).await?;
    info!(user_id = %caller.user_id, "user logged out");
    Ok(HttpResponse::NoContent().finish())
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.accounts.profile(&caller.user_id).await?;
    Ok(web::Json(profile.into()))
}

/// Change the caller's display name or photo.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[put("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Validated<ProfileUpdateRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let changes = ProfileUpdate::try_from(payload.into_inner())?;
    let profile = state
        .accounts
        .update_profile(&caller.user_id, changes)
        .await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestServices;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn send(services: &TestServices, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(services.http_state()))
                .service(
                    web::scope("/api/v1")
                        .service(register)
                        .service(login)
                        .service(logout)
                        .service(current_user)
                        .service(update_current_user),
                ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, json)
    }

    fn registration() -> Value {
        json!({"fullName": "Ada Lovelace", "email": "Ada@Example.com", "password": "Secur3Pass"})
    }

    async fn token_for(services: &TestServices) -> String {
        send(
            services,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(registration()),
        )
        .await;
        let (_, body) = send(
            services,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": "Secur3Pass"})),
        )
        .await;
        body["token"].as_str().expect("token").to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn well_formed_registration_creates_the_account() {
        let services = TestServices::new();
        let (status, body) = send(
            &services,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(registration()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["fullName"], "Ada Lovelace");
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn weak_password_yields_one_composition_failure() {
        let services = TestServices::new();
        let (status, body) = send(
            &services,
            test::TestRequest::post().uri("/api/v1/auth/register").set_json(
                json!({"fullName": "Ada Lovelace", "email": "ada@example.com", "password": "password"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_array().expect("errors");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "password");
        assert!(
            errors[0]["message"]
                .as_str()
                .is_some_and(|m| m.contains("uppercase"))
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn login_returns_token_and_expiry() {
        let services = TestServices::new();
        send(
            &services,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(registration()),
        )
        .await;

        let (status, body) = send(
            &services,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ADA@example.com", "password": "Secur3Pass"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expiresIn"], 3600);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[rstest]
    #[actix_web::test]
    async fn me_requires_a_bearer_token() {
        let services = TestServices::new();
        let (status, body) =
            send(&services, test::TestRequest::get().uri("/api/v1/users/me")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_updates_and_logout_revokes() {
        let services = TestServices::new();
        let token = token_for(&services).await;
        let bearer = ("Authorization", format!("Bearer {token}"));

        let (status, body) = send(
            &services,
            test::TestRequest::put()
                .uri("/api/v1/users/me")
                .insert_header(bearer.clone())
                .set_json(json!({"fullName": "Ada King"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fullName"], "Ada King");

        let (status, _) = send(
            &services,
            test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .insert_header(bearer.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &services,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(bearer),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn invalid_profile_name_is_rejected() {
        let services = TestServices::new();
        let token = token_for(&services).await;

        let (status, body) = send(
            &services,
            test::TestRequest::put()
                .uri("/api/v1/users/me")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(json!({"fullName": "R2-D2"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "fullName");
    }
}
