//! Transaction API handlers.
//!
//! ```text
//! GET    /api/v1/transactions?category=food&kind=expense&from=2026-03-01&to=2026-03-31
//! POST   /api/v1/transactions
//! GET    /api/v1/transactions/{id}
//! PUT    /api/v1/transactions/{id}
//! DELETE /api/v1/transactions/{id}
//! ```

use std::sync::OnceLock;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, DESCRIPTION_MAX, Error, TITLE_MAX, Transaction, TransactionDraft, TransactionFilter,
    TransactionId, TransactionKind, VENDOR_MAX,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    AmountInput, Check, MAX_FUTURE_DAYS, RuleSet, Validated, ValidatedPayload, ValidatedQuery,
    field_error, fields, parse_calendar_date, path_uuid,
};

const NOT_FOUND: &str = "transaction not found";

/// Body for creating or replacing a transaction.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Short label, 1 to 100 characters.
    #[schema(example = "Weekly groceries")]
    pub title: String,
    /// Amount as a number or numeric string with at most two decimals.
    #[schema(value_type = String, example = "42.50")]
    pub amount: AmountInput,
    /// `income` or `expense`; defaults to `expense`.
    #[schema(example = "expense")]
    pub kind: Option<String>,
    /// One of the fixed categories.
    #[schema(example = "food")]
    pub category: String,
    /// Calendar date, `YYYY-MM-DD`.
    #[schema(example = "2026-03-14")]
    pub date: String,
    /// Where the money went or came from.
    pub vendor: Option<String>,
    /// Free-form note.
    pub description: Option<String>,
}

impl ValidatedPayload for TransactionRequest {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::required(RuleSet::new(), "title");
            let rules = fields::bounded_text(rules, "title", 1, TITLE_MAX);
            let rules = fields::amount(rules, "amount");
            let rules = fields::category(fields::required(rules, "category"), "category");
            let rules = rules.rule(
                "kind",
                Check::OneOf(TransactionKind::NAMES),
                "kind must be income or expense",
            );
            let rules = fields::date(fields::required(rules, "date"), "date", Some(MAX_FUTURE_DAYS));
            let rules = fields::bounded_text(rules, "vendor", 0, VENDOR_MAX);
            fields::bounded_text(rules, "description", 0, DESCRIPTION_MAX)
        })
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub(crate) fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, Error> {
    parse_calendar_date(raw).ok_or_else(|| field_error(field, format!("{field} must be a valid date")))
}

impl TryFrom<TransactionRequest> for TransactionDraft {
    type Error = Error;

    fn try_from(value: TransactionRequest) -> Result<Self, Self::Error> {
        let kind = optional_text(value.kind)
            .map(|kind| kind.parse::<TransactionKind>())
            .transpose()
            .map_err(|e| field_error("kind", e))?
            .unwrap_or_default();
        Ok(Self {
            title: value.title,
            amount: value.amount.to_money("amount")?,
            kind,
            category: value
                .category
                .parse::<Category>()
                .map_err(|e| field_error("category", e))?,
            date: parse_date("date", &value.date)?,
            vendor: optional_text(value.vendor),
            description: optional_text(value.description),
        })
    }
}

/// Query parameters for listing transactions.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    /// Only this category.
    pub category: Option<String>,
    /// Only `income` or `expense`.
    pub kind: Option<String>,
    /// Earliest date, inclusive.
    pub from: Option<String>,
    /// Latest date, inclusive.
    pub to: Option<String>,
}

impl ValidatedPayload for TransactionQuery {
    fn rules() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            let rules = fields::category(RuleSet::new(), "category");
            let rules = rules.rule(
                "kind",
                Check::OneOf(TransactionKind::NAMES),
                "kind must be income or expense",
            );
            let rules = fields::date(rules, "from", None);
            fields::date(rules, "to", None)
        })
    }
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(value: TransactionQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            category: optional_text(value.category)
                .map(|c| c.parse::<Category>())
                .transpose()
                .map_err(|e| field_error("category", e))?,
            kind: optional_text(value.kind)
                .map(|k| k.parse::<TransactionKind>())
                .transpose()
                .map_err(|e| field_error("kind", e))?,
            from: optional_text(value.from)
                .map(|raw| parse_date("from", &raw))
                .transpose()?,
            to: optional_text(value.to)
                .map(|raw| parse_date("to", &raw))
                .transpose()?,
        })
    }
}

/// Transaction as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Identifier.
    pub id: String,
    /// Short label.
    pub title: String,
    /// Decimal amount.
    #[schema(example = "42.50")]
    pub amount: String,
    /// `income` or `expense`.
    pub kind: String,
    /// Category name.
    pub category: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Vendor, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Note, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            title: tx.title,
            amount: tx.amount.to_string(),
            kind: tx.kind.to_string(),
            category: tx.category.to_string(),
            date: tx.date,
            vendor: tx.vendor,
            description: tx.description,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

fn transaction_id(raw: &str) -> Result<TransactionId, Error> {
    path_uuid(raw, NOT_FOUND).map(TransactionId::from_uuid)
}

/// List the caller's transactions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions", body = [TransactionResponse]),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "listTransactions"
)]
#[get("/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: ValidatedQuery<TransactionQuery>,
) -> ApiResult<web::Json<Vec<TransactionResponse>>> {
    let filter = TransactionFilter::try_from(query.into_inner())?;
    let transactions = state
        .ledger
        .list_transactions(&caller.user_id, &filter)
        .await?;
    Ok(web::Json(transactions.into_iter().map(Into::into).collect()))
}

/// Record a transaction.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "createTransaction"
)]
#[post("/transactions")]
pub async fn create_transaction(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Validated<TransactionRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TransactionDraft::try_from(payload.into_inner())?;
    let transaction = state
        .ledger
        .create_transaction(&caller.user_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(TransactionResponse::from(transaction)))
}

/// Fetch one transaction.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{id}",
    params(("id" = String, Path, description = "Transaction identifier")),
    responses(
        (status = 200, description = "Transaction", body = TransactionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "getTransaction"
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let id = transaction_id(&path)?;
    let transaction = state.ledger.transaction(&caller.user_id, &id).await?;
    Ok(web::Json(transaction.into()))
}

/// Replace every editable field of a transaction.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{id}",
    params(("id" = String, Path, description = "Transaction identifier")),
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Updated transaction", body = TransactionResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "replaceTransaction"
)]
#[put("/transactions/{id}")]
pub async fn replace_transaction(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: Validated<TransactionRequest>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let id = transaction_id(&path)?;
    let draft = TransactionDraft::try_from(payload.into_inner())?;
    let transaction = state
        .ledger
        .replace_transaction(&caller.user_id, &id, draft)
        .await?;
    Ok(web::Json(transaction.into()))
}

/// Delete a transaction.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}",
    params(("id" = String, Path, description = "Transaction identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "deleteTransaction"
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = transaction_id(&path)?;
    state.ledger.delete_transaction(&caller.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
