//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{AccountService, LedgerService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, sessions and profiles.
    pub accounts: AccountService,
    /// Transactions, budgets, goals and the dashboard.
    pub ledger: LedgerService,
    /// Clock used by date rules during validation.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Bundle services with the clock they share.
    pub fn new(accounts: AccountService, ledger: LedgerService, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            ledger,
            clock,
        }
    }
}
