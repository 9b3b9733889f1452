//! Port for bearer session storage.
//!
//! Adapters key records by the token digest; the raw token never reaches
//! storage.

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::domain::{SessionRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session repository adapters.
    pub enum SessionPersistenceError {
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
    }
}

/// Storage for issued bearer sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a session under the token digest.
    async fn insert(&self, digest: &str, record: SessionRecord)
    -> Result<(), SessionPersistenceError>;

    /// Look up a session by token digest.
    async fn find(&self, digest: &str) -> Result<Option<SessionRecord>, SessionPersistenceError>;

    /// Drop one session; missing digests are ignored.
    async fn remove(&self, digest: &str) -> Result<(), SessionPersistenceError>;

    /// Drop every session belonging to `user_id`.
    async fn remove_for_user(&self, user_id: &UserId) -> Result<(), SessionPersistenceError>;

    /// Drop every session that expired at or before `now`, returning how
    /// many were removed.
    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionPersistenceError>;
}
