//! Port for transaction persistence.

use async_trait::async_trait;

use crate::domain::{Transaction, TransactionFilter, TransactionId, UserId};

use super::LedgerPersistenceError;

/// Storage for transactions, always scoped to an owner.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Store a new transaction.
    async fn insert(&self, transaction: &Transaction) -> Result<(), LedgerPersistenceError>;

    /// Replace an existing transaction.
    async fn update(&self, transaction: &Transaction) -> Result<(), LedgerPersistenceError>;

    /// Fetch one of `owner`'s transactions.
    async fn find(
        &self,
        owner: &UserId,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, LedgerPersistenceError>;

    /// List `owner`'s transactions matching `filter`, newest date first.
    async fn list(
        &self,
        owner: &UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerPersistenceError>;

    /// Delete one of `owner`'s transactions; returns whether it existed.
    async fn delete(&self, owner: &UserId, id: &TransactionId)
    -> Result<bool, LedgerPersistenceError>;
}
