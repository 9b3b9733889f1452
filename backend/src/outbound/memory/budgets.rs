//! In-memory [`BudgetRepository`].

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{BudgetRepository, LedgerPersistenceError};
use crate::domain::{Budget, BudgetId, BudgetMonth, UserId};

use super::lock;

/// Process-local budget store.
#[derive(Default)]
pub struct InMemoryBudgetRepository {
    rows: Mutex<Vec<Budget>>,
}

impl InMemoryBudgetRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn upsert(&self, budget: Budget) -> Result<Budget, LedgerPersistenceError> {
        let mut rows = lock(&self.rows, "budget").map_err(LedgerPersistenceError::query)?;
        let existing = rows.iter_mut().find(|row| {
            row.owner == budget.owner && row.category == budget.category && row.month == budget.month
        });
        if let Some(row) = existing {
            row.limit = budget.limit;
            return Ok(row.clone());
        }
        rows.push(budget.clone());
        Ok(budget)
    }

    async fn list(
        &self,
        owner: &UserId,
        month: Option<BudgetMonth>,
    ) -> Result<Vec<Budget>, LedgerPersistenceError> {
        let rows = lock(&self.rows, "budget").map_err(LedgerPersistenceError::query)?;
        let mut matching: Vec<Budget> = rows
            .iter()
            .filter(|row| row.owner == *owner && month.is_none_or(|m| m == row.month))
            .cloned()
            .collect();
        matching.sort_by_key(|row| (row.month, row.category));
        Ok(matching)
    }

    async fn delete(&self, owner: &UserId, id: &BudgetId) -> Result<bool, LedgerPersistenceError> {
        let mut rows = lock(&self.rows, "budget").map_err(LedgerPersistenceError::query)?;
        let before = rows.len();
        rows.retain(|row| !(row.id == *id && row.owner == *owner));
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Money};

    fn budget(owner: UserId, limit: &str) -> Budget {
        Budget {
            id: BudgetId::random(),
            owner,
            category: Category::Food,
            month: "2026-03".parse().expect("month"),
            limit: Money::parse(limit).expect("limit"),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_limit_and_keeps_id() {
        let repo = InMemoryBudgetRepository::new();
        let owner = UserId::random();
        let first = repo.upsert(budget(owner, "100")).await.expect("insert");
        let second = repo.upsert(budget(owner, "250")).await.expect("replace");

        assert_eq!(first.id, second.id);
        assert_eq!(second.limit.to_string(), "250.00");
        assert_eq!(repo.list(&owner, None).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn delete_ignores_other_owners() {
        let repo = InMemoryBudgetRepository::new();
        let stored = repo
            .upsert(budget(UserId::random(), "100"))
            .await
            .expect("insert");
        let deleted = repo
            .delete(&UserId::random(), &stored.id)
            .await
            .expect("delete");
        assert!(!deleted);
    }
}
