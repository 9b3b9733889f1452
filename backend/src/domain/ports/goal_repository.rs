//! Port for savings goal persistence.

use async_trait::async_trait;

use crate::domain::{Goal, GoalId, UserId};

use super::LedgerPersistenceError;

/// Storage for savings goals.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Store a new goal or replace an existing one with the same id.
    async fn save(&self, goal: &Goal) -> Result<(), LedgerPersistenceError>;

    /// Fetch one of `owner`'s goals.
    async fn find(&self, owner: &UserId, id: &GoalId)
    -> Result<Option<Goal>, LedgerPersistenceError>;

    /// List `owner`'s goals, oldest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Goal>, LedgerPersistenceError>;

    /// Delete one of `owner`'s goals; returns whether it existed.
    async fn delete(&self, owner: &UserId, id: &GoalId) -> Result<bool, LedgerPersistenceError>;
}
