//! Concurrent per-user session store.
//!
//! A [`SessionStore`] maps a user identity to that user's active session
//! value. The contract is intentionally small:
//!
//! - `put` unconditionally inserts or replaces (last writer wins) and hands
//!   back the replaced value so callers can reclaim its resources,
//! - `get` is a pure lookup where absence is a normal outcome,
//! - there is no delete and no expiry; replacement is the only removal.
//!
//! The store is a cheaply clonable handle; all clones share state. Access is
//! serialized through a `tokio::sync::RwLock`, which is required because
//! handler tasks run on a multi-threaded runtime.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

mod user;

pub use user::UserId;

/// Concurrent map from user identity to session value.
pub struct SessionStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Display,
    V: Clone,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace the session for `key`.
    ///
    /// Returns the previously stored value, if any, so the caller can
    /// reclaim resources owned by the replaced session.
    pub async fn put(&self, key: K, value: V) -> Option<V> {
        let mut map = self.inner.write().await;
        let replaced = map.insert(key.clone(), value);
        debug!(user = %key, replaced = replaced.is_some(), "Session stored");
        replaced
    }

    /// Look up the session for `key`.
    ///
    /// `None` means "no active session for this user" and is not an error.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl<K, V> Default for SessionStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Display,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for SessionStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store: SessionStore<UserId, String> = SessionStore::new();
        assert_eq!(store.get(&UserId::new(1)).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = SessionStore::new();
        let user = UserId::new(42);

        let replaced = store.put(user, "doc-a".to_string()).await;
        assert_eq!(replaced, None);
        assert_eq!(store.get(&user).await, Some("doc-a".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_replaces_last_writer_wins() {
        let store = SessionStore::new();
        let user = UserId::new(42);

        store.put(user, "doc-a".to_string()).await;
        let replaced = store.put(user, "doc-b".to_string()).await;

        assert_eq!(replaced, Some("doc-a".to_string()));
        assert_eq!(store.get(&user).await, Some("doc-b".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_per_user_isolation() {
        let store = SessionStore::new();
        let alice = UserId::new(1);
        let bob = UserId::new(2);

        store.put(alice, "alice-doc".to_string()).await;
        store.put(bob, "bob-doc".to_string()).await;

        // Replacing Alice's session leaves Bob's untouched
        store.put(alice, "alice-doc-2".to_string()).await;

        assert_eq!(store.get(&alice).await, Some("alice-doc-2".to_string()));
        assert_eq!(store.get(&bob).await, Some("bob-doc".to_string()));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::new();
        let handle = store.clone();
        let user = UserId::new(7);

        store.put(user, "shared".to_string()).await;
        assert_eq!(handle.get(&user).await, Some("shared".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_puts_keep_single_entry() {
        let store = SessionStore::new();
        let user = UserId::new(9);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put(user, format!("doc-{i}")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Whichever writer won, there is exactly one entry
        assert_eq!(store.len().await, 1);
        assert!(store.get(&user).await.is_some());
    }
}
