//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for accounts and the personal
//! ledger, plus the services that drive them through the ports in
//! [`ports`]. Inbound adapters convert request payloads into these types;
//! nothing here knows about HTTP beyond the [`Error`] payload.
//!
//! Public surface:
//! - Error (alias to `error::Error`) - API error response payload.
//! - AccountService - registration, login, bearer sessions, password reset.
//! - LedgerService - transactions, budgets, goals and the dashboard.

pub mod account_service;
pub mod auth;
pub mod budget;
pub mod error;
pub mod goal;
pub mod ledger_service;
pub mod money;
pub mod ports;
pub mod trace_id;
pub mod transaction;
pub mod user;

pub use self::account_service::{AccountPorts, AccountService, AccountSettings};
pub use self::auth::{
    CredentialsError, IssuedSession, LoginCredentials, NewPassword, PASSWORD_MAX, PASSWORD_MIN,
    PasswordResetSubmission, RESET_CODE_DIGITS, Registration, ResetCode, SessionRecord,
    SessionToken, meets_password_composition,
};
pub use self::budget::{Budget, BudgetId, BudgetMonth, BudgetMonthError, BudgetUsage};
pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldError, VALIDATION_FAILED};
pub use self::goal::{GOAL_NAME_MAX, Goal, GoalDraft, GoalId};
pub use self::ledger_service::{
    BudgetInput, CategorySpending, DashboardSummary, LedgerPorts, LedgerService, MonthTotals,
};
pub use self::money::{Balance, Money, MoneyError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{
    Category, DESCRIPTION_MAX, TITLE_MAX, Transaction, TransactionDraft, TransactionFilter,
    TransactionId, TransactionKind, UnknownVariant, VENDOR_MAX,
};
pub use self::user::{
    EmailAddress, FULL_NAME_MAX, FULL_NAME_MIN, FullName, PROFILE_PHOTO_MAX, PasswordHash,
    PasswordReset, ProfilePhoto, ProfileUpdate, User, UserId, UserProfile, UserValidationError,
    email_regex, is_letters_and_spaces,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use fintrack::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
