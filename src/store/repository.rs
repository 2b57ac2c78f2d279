//! User store
//!
//! An insertion-ordered list with a monotonically increasing id counter.
//! Lookups are linear scans. A single `RwLock` serializes writers, and every
//! compound step (find-then-mutate) happens under one guard.

use crate::store::models::User;
use tokio::sync::RwLock;

#[derive(Debug)]
struct StoreInner {
    users: Vec<User>,
    next_id: u64,
}

/// Shared user collection. Callers only ever receive clones.
#[derive(Debug)]
pub struct UserStore {
    inner: RwLock<StoreInner>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store; the first id handed out is 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Store a new user under the next id and return the full record
    pub async fn append(&self, username: String, password_hash: String) -> User {
        let mut inner = self.inner.write().await;

        let user = User {
            id: inner.next_id,
            username,
            password_hash,
        };
        inner.next_id += 1;
        inner.users.push(user.clone());

        user
    }

    /// Snapshot of every user in insertion order
    pub async fn list_all(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    pub async fn find_by_id(&self, id: u64) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// First user registered under `username`; duplicates are allowed
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Replace the username of `id`, returning the updated record
    pub async fn update_username(&self, id: u64, new_username: String) -> Option<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.iter_mut().find(|u| u.id == id)?;
        user.username = new_username;
        Some(user.clone())
    }

    /// Remove `id`. Returns false when no such user exists.
    pub async fn remove(&self, id: u64) -> bool {
        let mut inner = self.inner.write().await;
        match inner.users.iter().position(|u| u.id == id) {
            Some(index) => {
                inner.users.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
