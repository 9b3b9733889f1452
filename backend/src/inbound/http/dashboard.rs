//! Monthly dashboard handler.
//!
//! ```text
//! GET /api/v1/dashboard?month=2026-03
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{BudgetUsage, CategorySpending, DashboardSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::budgets::MonthQuery;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ValidatedQuery;

/// Spending in one category.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategorySpendingResponse {
    /// Category name.
    pub category: String,
    /// Total spent.
    #[schema(example = "120.40")]
    pub amount: String,
}

impl From<CategorySpending> for CategorySpendingResponse {
    fn from(spending: CategorySpending) -> Self {
        Self {
            category: spending.category.to_string(),
            amount: spending.amount.to_string(),
        }
    }
}

/// Budget with what was spent against it.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsageResponse {
    /// Budget identifier.
    pub id: String,
    /// Category name.
    pub category: String,
    /// Spending limit.
    pub limit: String,
    /// Expenses recorded against the budget.
    pub spent: String,
    /// Limit minus spent, never negative.
    pub remaining: String,
    /// Whether spending exceeded the limit.
    pub over_budget: bool,
}

impl From<BudgetUsage> for BudgetUsageResponse {
    fn from(usage: BudgetUsage) -> Self {
        Self {
            id: usage.budget.id.to_string(),
            category: usage.budget.category.to_string(),
            limit: usage.budget.limit.to_string(),
            spent: usage.spent.to_string(),
            remaining: usage.remaining.to_string(),
            over_budget: usage.over_budget,
        }
    }
}

/// Monthly overview.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Month summarised, `YYYY-MM`.
    #[schema(example = "2026-03")]
    pub month: String,
    /// Sum of income.
    #[schema(example = "3000.00")]
    pub total_income: String,
    /// Sum of expenses.
    #[schema(example = "1430.25")]
    pub total_expenses: String,
    /// Income minus expenses; may be negative.
    #[schema(example = "1569.75")]
    pub balance: String,
    /// Spending per category, largest first.
    pub spending_by_category: Vec<CategorySpendingResponse>,
    /// Budgets for the month.
    pub budgets: Vec<BudgetUsageResponse>,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            month: summary.month.to_string(),
            total_income: summary.totals.income.to_string(),
            total_expenses: summary.totals.expenses.to_string(),
            balance: summary.totals.balance.to_string(),
            spending_by_category: summary.spending.into_iter().map(Into::into).collect(),
            budgets: summary.budgets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Summarise a month; defaults to the current month.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(MonthQuery),
    responses(
        (status = 200, description = "Monthly summary", body = DashboardResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: ValidatedQuery<MonthQuery>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let month = query.into_inner().month()?;
    let summary = state.ledger.dashboard(&caller.user_id, month).await?;
    Ok(web::Json(summary.into()))
}
