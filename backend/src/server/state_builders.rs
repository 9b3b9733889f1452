//! Builders wiring domain services to their outbound adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{PasswordHasher, ResetCodeNotifier};
use crate::domain::{AccountPorts, AccountService, AccountSettings, LedgerPorts, LedgerService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryBudgetRepository, InMemoryGoalRepository, InMemorySessionRepository,
    InMemoryTransactionRepository, InMemoryUserRepository,
};
use crate::outbound::security::{Argon2PasswordHasher, LoggingResetCodeNotifier};

/// Adapters that differ between production and tests.
pub struct Collaborators {
    /// Source of "now".
    pub clock: Arc<dyn Clock>,
    /// Password hashing.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Reset code delivery.
    pub notifier: Arc<dyn ResetCodeNotifier>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            clock: Arc::new(DefaultClock),
            hasher: Arc::new(Argon2PasswordHasher::default()),
            notifier: Arc::new(LoggingResetCodeNotifier),
        }
    }
}

/// Build the HTTP state over fresh in-memory stores.
///
/// # Examples
/// ```
/// use fintrack::domain::AccountSettings;
/// use fintrack::server::{Collaborators, build_http_state};
///
/// let state = build_http_state(AccountSettings::default(), Collaborators::default());
/// ```
pub fn build_http_state(settings: AccountSettings, collaborators: Collaborators) -> HttpState {
    let Collaborators {
        clock,
        hasher,
        notifier,
    } = collaborators;
    let accounts = AccountService::new(
        AccountPorts {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            hasher,
            notifier,
        },
        clock.clone(),
        settings,
    );
    let ledger = LedgerService::new(
        LedgerPorts {
            transactions: Arc::new(InMemoryTransactionRepository::new()),
            budgets: Arc::new(InMemoryBudgetRepository::new()),
            goals: Arc::new(InMemoryGoalRepository::new()),
        },
        clock.clone(),
    );
    HttpState::new(accounts, ledger, clock)
}
