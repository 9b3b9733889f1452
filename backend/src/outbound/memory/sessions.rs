//! In-memory [`SessionRepository`] keyed by token digest.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{SessionPersistenceError, SessionRepository};
use crate::domain::{SessionRecord, UserId};

use super::lock;

/// Process-local bearer session store.
#[derive(Default)]
pub struct InMemorySessionRepository {
    records: Mutex<HashMap<String, SessionRecord>>,
}

impl InMemorySessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(
        &self,
        digest: &str,
        record: SessionRecord,
    ) -> Result<(), SessionPersistenceError> {
        lock(&self.records, "session")
            .map_err(SessionPersistenceError::query)?
            .insert(digest.to_owned(), record);
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<SessionRecord>, SessionPersistenceError> {
        Ok(lock(&self.records, "session")
            .map_err(SessionPersistenceError::query)?
            .get(digest)
            .copied())
    }

    async fn remove(&self, digest: &str) -> Result<(), SessionPersistenceError> {
        lock(&self.records, "session")
            .map_err(SessionPersistenceError::query)?
            .remove(digest);
        Ok(())
    }

    async fn remove_for_user(&self, user_id: &UserId) -> Result<(), SessionPersistenceError> {
        lock(&self.records, "session")
            .map_err(SessionPersistenceError::query)?
            .retain(|_, record| record.user_id != *user_id);
        Ok(())
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionPersistenceError> {
        let mut records = lock(&self.records, "session").map_err(SessionPersistenceError::query)?;
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);
        Ok(before - records.len())
    }
}
