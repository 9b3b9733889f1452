//! HTTP inbound adapter exposing REST endpoints.
//!
//! Requests under `/api/v1` pass through [`sanitize::Sanitize`] before any
//! extractor runs; [`validation::Validated`] then applies each payload's
//! rule set.

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod error;
pub mod goals;
pub mod health;
pub mod password_reset;
pub mod sanitize;
pub mod schemas;
pub mod state;
pub mod transactions;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{Scope, web};

/// Register every `/api/v1` endpoint on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use fintrack::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(password_reset::forgot_password)
        .service(password_reset::reset_password)
        .service(transactions::list_transactions)
        .service(transactions::create_transaction)
        .service(transactions::get_transaction)
        .service(transactions::replace_transaction)
        .service(transactions::delete_transaction)
        .service(budgets::list_budgets)
        .service(budgets::upsert_budget)
        .service(budgets::delete_budget)
        .service(goals::list_goals)
        .service(goals::create_goal)
        .service(goals::contribute)
        .service(goals::delete_goal)
        .service(dashboard::dashboard);
}

/// `/api/v1` scope with sanitisation applied to every endpoint.
pub fn api_scope() -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/api/v1")
        .wrap(sanitize::Sanitize)
        .configure(configure_api)
}
