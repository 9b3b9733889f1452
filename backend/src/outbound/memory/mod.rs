//! In-memory repositories.
//!
//! Every adapter keeps its records behind a `std::sync::Mutex`; locks are
//! never held across an await point. A poisoned lock surfaces as a `Query`
//! error rather than a panic.

use std::sync::{Mutex, MutexGuard};

mod budgets;
mod goals;
mod sessions;
mod transactions;
mod users;

pub use budgets::InMemoryBudgetRepository;
pub use goals::InMemoryGoalRepository;
pub use sessions::InMemorySessionRepository;
pub use transactions::InMemoryTransactionRepository;
pub use users::InMemoryUserRepository;

/// Lock `mutex`, reporting poisoning as a message for the port error.
fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex
        .lock()
        .map_err(|_| format!("{what} store lock poisoned"))
}
