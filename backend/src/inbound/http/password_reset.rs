//! Password reset handlers.
//!
//! ```text
//! POST /api/v1/auth/forgot-password {"email":"ada@example.com"}
//! POST /api/v1/auth/reset-password {"email":"ada@example.com","otp":"123456","newPassword":"N3wSecret"}
//! ```

use std::sync::OnceLock;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, Error, NewPassword, PasswordResetSubmission, ResetCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Check, RuleSet, Validated, ValidatedPayload, field_error, fields,
};

/// Answer for every forgot-password request, known email or not.
pub const RESET_REQUESTED: &str = "If the email is registered, a reset code has been sent";

/// Body for `POST /api/v1/auth/forgot-password`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    /// Account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl ValidatedPayload for ForgotPasswordRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| fields::email(RuleSet::new(), "email"))
    }
}

/// Body for `POST /api/v1/auth/reset-password`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Six digit code delivered to the account.
    #[schema(example = "123456")]
    pub otp: String,
    /// Replacement password.
    #[schema(example = "N3wSecret")]
    pub new_password: String,
}

impl ValidatedPayload for ResetPasswordRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::email(RuleSet::new(), "email");
            let rules = fields::required(rules, "otp").rule(
                "otp",
                Check::Pattern(fields::otp_pattern().clone()),
                "otp must be exactly 6 digits",
            );
            fields::new_password(rules, "newPassword")
        })
    }
}

impl TryFrom<ResetPasswordRequest> for PasswordResetSubmission {
    type Error = Error;

    fn try_from(value: ResetPasswordRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: EmailAddress::new(&value.email).map_err(|e| field_error("email", e))?,
            code: ResetCode::parse(&value.otp).map_err(|e| field_error("otp", e))?,
            new_password: NewPassword::new(&value.new_password)
                .map_err(|e| field_error("newPassword", e))?,
        })
    }
}

/// Acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Send a reset code to the account, when it exists.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Request accepted", body = MessageResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: Validated<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let email = EmailAddress::new(&payload.email).map_err(|e| field_error("email", e))?;
    state.accounts.request_password_reset(&email).await?;
    Ok(HttpResponse::Accepted().json(MessageResponse {
        message: RESET_REQUESTED.to_owned(),
    }))
}

/// Replace the password using a delivered reset code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Validation failed or code invalid", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: Validated<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let submission = PasswordResetSubmission::try_from(payload.into_inner())?;
    state.accounts.reset_password(submission).await?;
    Ok(HttpResponse::NoContent().finish())
}
