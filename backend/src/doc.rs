//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response DTOs,
//! the domain error wrappers from [`crate::inbound::http::schemas`] and the
//! bearer token security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::budgets::{BudgetRequest, BudgetResponse};
use crate::inbound::http::dashboard::{
    BudgetUsageResponse, CategorySpendingResponse, DashboardResponse,
};
use crate::inbound::http::goals::{ContributionRequest, GoalRequest, GoalResponse};
use crate::inbound::http::password_reset::{
    ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, FieldErrorSchema};
use crate::inbound::http::transactions::{TransactionRequest, TransactionResponse};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, ProfileResponse, ProfileUpdateRequest, RegisterRequest,
};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fintrack API",
        description = "Accounts, transactions, budgets, savings goals and a monthly dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::password_reset::forgot_password,
        crate::inbound::http::password_reset::reset_password,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::transactions::create_transaction,
        crate::inbound::http::transactions::get_transaction,
        crate::inbound::http::transactions::replace_transaction,
        crate::inbound::http::transactions::delete_transaction,
        crate::inbound::http::budgets::list_budgets,
        crate::inbound::http::budgets::upsert_budget,
        crate::inbound::http::budgets::delete_budget,
        crate::inbound::http::goals::list_goals,
        crate::inbound::http::goals::create_goal,
        crate::inbound::http::goals::contribute,
        crate::inbound::http::goals::delete_goal,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        ProfileResponse,
        ProfileUpdateRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        MessageResponse,
        TransactionRequest,
        TransactionResponse,
        BudgetRequest,
        BudgetResponse,
        GoalRequest,
        ContributionRequest,
        GoalResponse,
        DashboardResponse,
        CategorySpendingResponse,
        BudgetUsageResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and password reset"),
        (name = "users", description = "The caller's profile"),
        (name = "transactions", description = "Income and expense records"),
        (name = "budgets", description = "Monthly spending limits"),
        (name = "goals", description = "Savings goals"),
        (name = "dashboard", description = "Monthly summary"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/transactions/{id}")]
    #[case("/api/v1/goals/{id}/contributions")]
    #[case("/api/v1/dashboard")]
    #[case("/health/ready")]
    fn document_lists_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn document_registers_the_error_schema_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("crate.domain.Error"));
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[rstest]
    #[case("/api/v1/transactions", "post", "400")]
    #[case("/api/v1/auth/login", "post", "401")]
    #[case("/api/v1/dashboard", "get", "400")]
    fn error_responses_reference_the_shared_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("document serialises");
        let schema_ref = &doc["paths"][path][method]["responses"][status]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(schema_ref, "#/components/schemas/crate.domain.Error");
    }
}
