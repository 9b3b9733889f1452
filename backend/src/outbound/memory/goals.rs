//! In-memory [`GoalRepository`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{GoalRepository, LedgerPersistenceError};
use crate::domain::{Goal, GoalId, UserId};

use super::lock;

/// Process-local goal store.
#[derive(Default)]
pub struct InMemoryGoalRepository {
    rows: Mutex<HashMap<GoalId, Goal>>,
}

impl InMemoryGoalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoalRepository {
    async fn save(&self, goal: &Goal) -> Result<(), LedgerPersistenceError> {
        lock(&self.rows, "goal")
            .map_err(LedgerPersistenceError::query)?
            .insert(goal.id, goal.clone());
        Ok(())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &GoalId,
    ) -> Result<Option<Goal>, LedgerPersistenceError> {
        let rows = lock(&self.rows, "goal").map_err(LedgerPersistenceError::query)?;
        Ok(rows.get(id).filter(|goal| goal.owner == *owner).cloned())
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Goal>, LedgerPersistenceError> {
        let rows = lock(&self.rows, "goal").map_err(LedgerPersistenceError::query)?;
        let mut goals: Vec<Goal> = rows
            .values()
            .filter(|goal| goal.owner == *owner)
            .cloned()
            .collect();
        goals.sort_by_key(|goal| goal.created_at);
        Ok(goals)
    }

    async fn delete(&self, owner: &UserId, id: &GoalId) -> Result<bool, LedgerPersistenceError> {
        let mut rows = lock(&self.rows, "goal").map_err(LedgerPersistenceError::query)?;
        if rows.get(id).is_some_and(|goal| goal.owner == *owner) {
            rows.remove(id);
            return Ok(true);
        }
        Ok(false)
    }
}
