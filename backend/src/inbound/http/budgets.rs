//! Budget API handlers.
//!
//! ```text
//! GET    /api/v1/budgets?month=2026-03
//! PUT    /api/v1/budgets {"category":"food","month":"2026-03","limit":"400"}
//! DELETE /api/v1/budgets/{id}
//! ```

use std::sync::OnceLock;

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Budget, BudgetId, BudgetInput, BudgetMonth, Category, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    AmountInput, RuleSet, Validated, ValidatedPayload, ValidatedQuery, field_error, fields,
    path_uuid,
};

/// Body for `PUT /api/v1/budgets`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    /// Category the limit applies to.
    #[schema(example = "food")]
    pub category: String,
    /// Month as `YYYY-MM`.
    #[schema(example = "2026-03")]
    pub month: String,
    /// Spending limit.
    #[schema(value_type = String, example = "400.00")]
    pub limit: AmountInput,
}

impl ValidatedPayload for BudgetRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::category(fields::required(RuleSet::new(), "category"), "category");
            let rules = fields::month(fields::required(rules, "month"), "month");
            fields::amount(rules, "limit")
        })
    }
}

pub(crate) fn parse_month(field: &str, raw: &str) -> Result<BudgetMonth, Error> {
    raw.parse::<BudgetMonth>().map_err(|e| field_error(field, e))
}

impl TryFrom<BudgetRequest> for BudgetInput {
    type Error = Error;

    fn try_from(value: BudgetRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            category: value
                .category
                .parse::<Category>()
                .map_err(|e| field_error("category", e))?,
            month: parse_month("month", &value.month)?,
            limit: value.limit.to_money("limit")?,
        })
    }
}

/// Optional month filter shared by the budget list and the dashboard.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// Month as `YYYY-MM`.
    pub month: Option<String>,
}

impl ValidatedPayload for MonthQuery {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| fields::month(RuleSet::new(), "month"))
    }
}

impl MonthQuery {
    /// Parsed month, when one was supplied.
    pub fn month(&self) -> Result<Option<BudgetMonth>, Error> {
        self.month
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_month("month", raw))
            .transpose()
    }
}

/// Budget as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    /// Identifier.
    pub id: String,
    /// Category name.
    pub category: String,
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Spending limit.
    #[schema(example = "400.00")]
    pub limit: String,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        Self {
            id: budget.id.to_string(),
            category: budget.category.to_string(),
            month: budget.month.to_string(),
            limit: budget.limit.to_string(),
        }
    }
}

/// List the caller's budgets, optionally for one month.
#[utoipa::path(
    get,
    path = "/api/v1/budgets",
    params(MonthQuery),
    responses(
        (status = 200, description = "Budgets", body = [BudgetResponse]),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["budgets"],
    operation_id = "listBudgets"
)]
#[get("/budgets")]
pub async fn list_budgets(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: ValidatedQuery<MonthQuery>,
) -> ApiResult<web::Json<Vec<BudgetResponse>>> {
    let month = query.into_inner().month()?;
    let budgets = state.ledger.list_budgets(&caller.user_id, month).await?;
    Ok(web::Json(budgets.into_iter().map(Into::into).collect()))
}

/// Create or replace the budget for a category and month.
#[utoipa::path(
    put,
    path = "/api/v1/budgets",
    request_body = BudgetRequest,
    responses(
        (status = 200, description = "Stored budget", body = BudgetResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["budgets"],
    operation_id = "upsertBudget"
)]
#[put("/budgets")]
pub async fn upsert_budget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Validated<BudgetRequest>,
) -> ApiResult<web::Json<BudgetResponse>> {
    let input = BudgetInput::try_from(payload.into_inner())?;
    let budget = state.ledger.upsert_budget(&caller.user_id, input).await?;
    Ok(web::Json(budget.into()))
}

/// Delete a budget.
#[utoipa::path(
    delete,
    path = "/api/v1/budgets/{id}",
    params(("id" = String, Path, description = "Budget identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["budgets"],
    operation_id = "deleteBudget"
)]
#[delete("/budgets/{id}")]
pub async fn delete_budget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path_uuid(&path, "budget not found").map(BudgetId::from_uuid)?;
    state.ledger.delete_budget(&caller.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
