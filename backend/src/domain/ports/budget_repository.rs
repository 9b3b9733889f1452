//! Port for budget persistence.

use async_trait::async_trait;

use crate::domain::{Budget, BudgetId, BudgetMonth, UserId};

use super::LedgerPersistenceError;

/// Storage for monthly category budgets.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Insert or replace the budget for the same owner, category and month.
    ///
    /// Returns the stored budget; a replaced budget keeps its identifier.
    async fn upsert(&self, budget: Budget) -> Result<Budget, LedgerPersistenceError>;

    /// List `owner`'s budgets, optionally for a single month.
    async fn list(
        &self,
        owner: &UserId,
        month: Option<BudgetMonth>,
    ) -> Result<Vec<Budget>, LedgerPersistenceError>;

    /// Delete one of `owner`'s budgets; returns whether it existed.
    async fn delete(&self, owner: &UserId, id: &BudgetId) -> Result<bool, LedgerPersistenceError>;
}
