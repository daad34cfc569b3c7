//! [`UserStore`]: in-memory user accounts with unique usernames.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::protocol::Role;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
}

/// A persisted user. Only the password hash is kept.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, UserRecord>,
}

/// Thread-safe user table. Ids start at 1 and are never reused.
#[derive(Clone, Debug)]
pub struct UserStore {
    inner: Arc<RwLock<Inner>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            })),
        }
    }

    /// All users in ascending id order.
    pub async fn find_all(&self) -> Vec<UserRecord> {
        self.inner.read().await.records.values().cloned().collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Option<UserRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.inner
            .read()
            .await
            .records
            .values()
            .find(|r| r.username == username)
            .cloned()
    }

    /// Insert a new user and return its id.
    ///
    /// The uniqueness check and the insert happen under one write lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UsernameTaken`] if the username exists.
    pub async fn insert(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut lock = self.inner.write().await;
        if lock.records.values().any(|r| r.username == user.username) {
            return Err(StoreError::UsernameTaken(user.username));
        }
        let id = lock.next_id;
        lock.next_id += 1;
        lock.records.insert(
            id,
            UserRecord {
                id,
                username: user.username,
                password_hash: user.password_hash,
                role: user.role,
            },
        );
        Ok(id)
    }

    /// Delete a user. A missing id is silently ignored.
    pub async fn delete(&self, id: i64) {
        self.inner.write().await.records.remove(&id);
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
