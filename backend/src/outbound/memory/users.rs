//! In-memory [`UserRepository`] keyed by id with a unique email index.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId};

use super::lock;

#[derive(Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// Process-local user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut table = lock(&self.table, "user").map_err(UserPersistenceError::query)?;
        let email = user.email.as_ref().to_owned();
        if table.by_email.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email(email));
        }
        table.by_email.insert(email, user.id);
        table.by_id.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut table = lock(&self.table, "user").map_err(UserPersistenceError::query)?;
        let Some(previous) = table.by_id.get(&user.id).map(|u| u.email.clone()) else {
            return Err(UserPersistenceError::missing(user.id.to_string()));
        };
        let email = user.email.as_ref().to_owned();
        if previous != user.email {
            if table.by_email.contains_key(&email) {
                return Err(UserPersistenceError::duplicate_email(email));
            }
            table.by_email.remove(previous.as_ref());
            table.by_email.insert(email, user.id);
        }
        table.by_id.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let table = lock(&self.table, "user").map_err(UserPersistenceError::query)?;
        Ok(table.by_id.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let table = lock(&self.table, "user").map_err(UserPersistenceError::query)?;
        Ok(table
            .by_email
            .get(email.as_ref())
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }
}
