//! In-memory [`TransactionRepository`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{LedgerPersistenceError, TransactionRepository};
use crate::domain::{Transaction, TransactionFilter, TransactionId, UserId};

use super::lock;

/// Process-local transaction store.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    rows: Mutex<HashMap<TransactionId, Transaction>>,
}

impl InMemoryTransactionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), LedgerPersistenceError> {
        lock(&self.rows, "transaction")
            .map_err(LedgerPersistenceError::query)?
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), LedgerPersistenceError> {
        let mut rows = lock(&self.rows, "transaction").map_err(LedgerPersistenceError::query)?;
        match rows.get_mut(&transaction.id) {
            Some(row) if row.owner == transaction.owner => {
                *row = transaction.clone();
                Ok(())
            }
            _ => Err(LedgerPersistenceError::query(format!(
                "transaction {} not found",
                transaction.id
            ))),
        }
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, LedgerPersistenceError> {
        let rows = lock(&self.rows, "transaction").map_err(LedgerPersistenceError::query)?;
        Ok(rows.get(id).filter(|row| row.owner == *owner).cloned())
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerPersistenceError> {
        let rows = lock(&self.rows, "transaction").map_err(LedgerPersistenceError::query)?;
        let mut matching: Vec<Transaction> = rows
            .values()
            .filter(|row| row.owner == *owner && filter.matches(row))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(matching)
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &TransactionId,
    ) -> Result<bool, LedgerPersistenceError> {
        let mut rows = lock(&self.rows, "transaction").map_err(LedgerPersistenceError::query)?;
        if rows.get(id).is_some_and(|row| row.owner == *owner) {
            rows.remove(id);
            return Ok(true);
        }
        Ok(false)
    }
}
