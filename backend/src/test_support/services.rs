//! Services wired to in-memory adapters and a controllable clock.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use super::MutableClock;
use crate::domain::ports::{PasswordHasher, PasswordHasherError, ResetCodeNotifier};
use crate::domain::{
    AccountPorts, AccountService, AccountSettings, LedgerPorts, LedgerService, PasswordHash,
};
use crate::outbound::memory::{
    InMemoryBudgetRepository, InMemoryGoalRepository, InMemorySessionRepository,
    InMemoryTransactionRepository, InMemoryUserRepository,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::LoggingResetCodeNotifier;

/// Fixed starting instant for service tests.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .unwrap_or_else(|| panic!("valid fixture timestamp"))
}

/// Reversible "hash" keeping Argon2 out of fast unit tests.
#[derive(Default)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        hash.as_ref()
            .strip_prefix("plain:")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHasherError::malformed("missing plain: prefix"))
    }
}

/// Account and ledger services sharing one clock and one set of stores.
pub struct TestServices {
    pub clock: Arc<MutableClock>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub accounts: AccountService,
    pub ledger: LedgerService,
}

impl TestServices {
    /// Services that log reset codes instead of delivering them.
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(LoggingResetCodeNotifier))
    }

    /// Services delivering reset codes through `notifier`.
    pub fn with_notifier(notifier: Arc<dyn ResetCodeNotifier>) -> Self {
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let sessions = Arc::new(InMemorySessionRepository::new());
        let accounts = AccountService::new(
            AccountPorts {
                users: Arc::new(InMemoryUserRepository::new()),
                sessions: sessions.clone(),
                hasher: Arc::new(PlainTextHasher),
                notifier,
            },
            clock.clone(),
            AccountSettings::default(),
        );
        let ledger = LedgerService::new(
            LedgerPorts {
                transactions: Arc::new(InMemoryTransactionRepository::new()),
                budgets: Arc::new(InMemoryBudgetRepository::new()),
                goals: Arc::new(InMemoryGoalRepository::new()),
            },
            clock.clone(),
        );
        Self {
            clock,
            sessions,
            accounts,
            ledger,
        }
    }

    /// HTTP state over the same services and clock.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(self.accounts.clone(), self.ledger.clone(), self.clock.clone())
    }
}
