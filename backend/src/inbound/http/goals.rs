//! Savings goal handlers.
//!
//! ```text
//! GET    /api/v1/goals
//! POST   /api/v1/goals {"name":"Holiday","targetAmount":"1500","deadline":"2026-08-01"}
//! POST   /api/v1/goals/{id}/contributions {"amount":"50"}
//! DELETE /api/v1/goals/{id}
//! ```

use std::sync::OnceLock;

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, GOAL_NAME_MAX, Goal, GoalDraft, GoalId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::transactions::parse_date;
use crate::inbound::http::validation::{
    AmountInput, RuleSet, Validated, ValidatedPayload, fields, path_uuid,
};

const NOT_FOUND: &str = "goal not found";

/// Body for `POST /api/v1/goals`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    /// Label, 1 to 100 characters.
    #[schema(example = "Holiday")]
    pub name: String,
    /// Amount to save.
    #[schema(value_type = String, example = "1500.00")]
    pub target_amount: AmountInput,
    /// Optional target date.
    #[schema(example = "2026-08-01")]
    pub deadline: Option<String>,
}

impl ValidatedPayload for GoalRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::required(RuleSet::new(), "name");
            let rules = fields::bounded_text(rules, "name", 1, GOAL_NAME_MAX);
            let rules = fields::amount(rules, "targetAmount");
            fields::date(rules, "deadline", None)
        })
    }
}

impl TryFrom<GoalRequest> for GoalDraft {
    type Error = Error;

    fn try_from(value: GoalRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            target: value.target_amount.to_money("targetAmount")?,
            deadline: value
                .deadline
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| parse_date("deadline", &raw))
                .transpose()?,
        })
    }
}

/// Body for `POST /api/v1/goals/{id}/contributions`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ContributionRequest {
    /// Amount added to the savings.
    #[schema(value_type = String, example = "50.00")]
    pub amount: AmountInput,
}

impl ValidatedPayload for ContributionRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| fields::amount(RuleSet::new(), "amount"))
    }
}

/// Goal with its progress.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    /// Identifier.
    pub id: String,
    /// Label.
    pub name: String,
    /// Amount to save.
    #[schema(example = "1500.00")]
    pub target_amount: String,
    /// Amount saved so far.
    #[schema(example = "250.00")]
    pub saved_amount: String,
    /// Amount still to save.
    #[schema(example = "1250.00")]
    pub remaining_amount: String,
    /// Whether the target has been reached.
    pub completed: bool,
    /// Target date, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id.to_string(),
            remaining_amount: goal.remaining().to_string(),
            completed: goal.is_complete(),
            target_amount: goal.target.to_string(),
            saved_amount: goal.saved.to_string(),
            name: goal.name,
            deadline: goal.deadline,
            created_at: goal.created_at,
        }
    }
}

fn goal_id(raw: &str) -> Result<GoalId, Error> {
    path_uuid(raw, NOT_FOUND).map(GoalId::from_uuid)
}

/// List the caller's goals, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/goals",
    responses(
        (status = 200, description = "Goals", body = [GoalResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["goals"],
    operation_id = "listGoals"
)]
#[get("/goals")]
pub async fn list_goals(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<GoalResponse>>> {
    let goals = state.ledger.list_goals(&caller.user_id).await?;
    Ok(web::Json(goals.into_iter().map(Into::into).collect()))
}

/// Start a savings goal.
#[utoipa::path(
    post,
    path = "/api/v1/goals",
    request_body = GoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["goals"],
    operation_id = "createGoal"
)]
#[post("/goals")]
pub async fn create_goal(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Validated<GoalRequest>,
) -> ApiResult<HttpResponse> {
    let draft = GoalDraft::try_from(payload.into_inner())?;
    let goal = state.ledger.create_goal(&caller.user_id, draft).await?;
    Ok(HttpResponse::Created().json(GoalResponse::from(goal)))
}

/// Add savings to a goal.
#[utoipa::path(
    post,
    path = "/api/v1/goals/{id}/contributions",
    params(("id" = String, Path, description = "Goal identifier")),
    request_body = ContributionRequest,
    responses(
        (status = 200, description = "Updated goal", body = GoalResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["goals"],
    operation_id = "contributeToGoal"
)]
#[post("/goals/{id}/contributions")]
pub async fn contribute(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: Validated<ContributionRequest>,
) -> ApiResult<web::Json<GoalResponse>> {
    let id = goal_id(&path)?;
    let amount = payload.amount.to_money("amount")?;
    let goal = state.ledger.contribute(&caller.user_id, &id, amount).await?;
    Ok(web::Json(goal.into()))
}

/// Delete a goal.
#[utoipa::path(
    delete,
    path = "/api/v1/goals/{id}",
    params(("id" = String, Path, description = "Goal identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["goals"],
    operation_id = "deleteGoal"
)]
#[delete("/goals/{id}")]
pub async fn delete_goal(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = goal_id(&path)?;
    state.ledger.delete_goal(&caller.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
