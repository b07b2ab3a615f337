use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// A bearer token issued by the auth API. Held only in memory; gone when the
/// process exits.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub acquired_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String) -> Self {
        Self {
            token,
            acquired_at: Utc::now(),
        }
    }
}

/// Outcome of a signup/login exchange. A response body without a `token`
/// field is a denial and carries the raw body for verbatim display.
#[derive(Clone, Debug)]
pub enum AuthAttempt {
    Granted { token: String },
    Denied { raw: String },
}

/// Shared in-memory session state. Token presence is the sole gate for
/// authenticated requests.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set(&self, session: Session) {
        let mut guard = self.inner.write().await;
        *guard = Some(session);
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated().await);
        assert!(store.token().await.is_none());
    }

    #[tokio::test]
    async fn store_holds_token_after_set() {
        let store = SessionStore::new();
        store.set(Session::new("abc".to_string())).await;

        assert!(store.is_authenticated().await);
        assert_eq!(store.token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn clones_share_the_same_session() {
        let store = SessionStore::new();
        let other = store.clone();
        store.set(Session::new("abc".to_string())).await;

        assert_eq!(other.token().await.as_deref(), Some("abc"));
    }
}
