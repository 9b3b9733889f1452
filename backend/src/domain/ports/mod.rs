//! Domain ports for the hexagonal boundary.
//!
//! Services depend only on these traits; `crate::outbound` provides adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod budget_repository;
mod goal_repository;
mod ledger_persistence_error;
mod password_hasher;
mod reset_code_notifier;
mod session_repository;
mod transaction_repository;
mod user_repository;

pub use budget_repository::BudgetRepository;
pub use goal_repository::GoalRepository;
pub use ledger_persistence_error::LedgerPersistenceError;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use reset_code_notifier::MockResetCodeNotifier;
pub use reset_code_notifier::{ResetCodeDeliveryError, ResetCodeNotifier};
pub use session_repository::{SessionPersistenceError, SessionRepository};
pub use transaction_repository::TransactionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
