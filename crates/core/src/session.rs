//! Session state shared between the API client and the UI

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

use crate::storage::{SESSION_KEY, TokenStorage, USER_EMAIL_KEY};

/// Authentication state of the current user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub email: Option<String>,
}

impl Session {
    pub fn authenticated(email: Option<String>) -> Self {
        Self {
            is_authenticated: true,
            email,
        }
    }

    /// Rebuild the session from persisted storage.
    ///
    /// The serialized blob wins when it parses, but an authenticated blob
    /// without a stored token is downgraded. Without a blob, the presence of
    /// a token decides.
    pub fn restore(storage: &dyn TokenStorage) -> Self {
        let has_token = storage.access_token().is_some();
        let stored_email = storage.get(USER_EMAIL_KEY).filter(|e| !e.is_empty());

        if let Some(blob) = storage.get(SESSION_KEY) {
            match serde_json::from_str::<Session>(&blob) {
                Ok(session) if session.is_authenticated && !has_token => {
                    tracing::debug!("Stored session has no access token, starting signed out");
                    return Self::default();
                }
                Ok(mut session) => {
                    if session.email.is_none() && session.is_authenticated {
                        session.email = stored_email;
                    }
                    return session;
                }
                Err(e) => tracing::warn!("Ignoring unreadable session blob: {e}"),
            }
        }

        if has_token {
            Self::authenticated(stored_email)
        } else {
            Self::default()
        }
    }
}

/// Read/write access to the current session
pub trait SessionStore: Send + Sync {
    /// Snapshot of the current session
    fn get(&self) -> Session;

    /// Replace the session
    fn set(&self, is_authenticated: bool, email: Option<String>);

    /// Reset to signed out
    fn clear(&self);
}

/// Session held only in memory
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, is_authenticated: bool, email: Option<String>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session {
            is_authenticated,
            email,
        };
    }

    fn clear(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
    }
}

/// Session mirrored into persisted storage on every change
pub struct PersistedSessionStore {
    inner: MemorySessionStore,
    storage: Arc<dyn TokenStorage>,
}

impl PersistedSessionStore {
    /// Restore from `storage` and keep mirroring into it
    pub fn restore(storage: Arc<dyn TokenStorage>) -> Self {
        let session = Session::restore(storage.as_ref());
        Self {
            inner: MemorySessionStore::new(session),
            storage,
        }
    }

    fn persist(&self, session: &Session) {
        let blob = match serde_json::to_string(session) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to serialize session: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, &blob) {
            tracing::warn!("Failed to persist session: {e}");
        }
        if let Some(email) = &session.email {
            if let Err(e) = self.storage.set(USER_EMAIL_KEY, email) {
                tracing::warn!("Failed to persist user email: {e}");
            }
        }
    }
}

impl SessionStore for PersistedSessionStore {
    fn get(&self) -> Session {
        self.inner.get()
    }

    fn set(&self, is_authenticated: bool, email: Option<String>) {
        self.inner.set(is_authenticated, email);
        self.persist(&self.inner.get());
    }

    fn clear(&self) {
        self.inner.clear();
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::warn!("Failed to remove session from storage: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ACCESS_TOKEN_KEY, MemoryStorage};

    #[test]
    fn test_restore_without_anything_is_signed_out() {
        let storage = MemoryStorage::new();
        assert_eq!(Session::restore(&storage), Session::default());
    }

    #[test]
    fn test_restore_from_token_and_email() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        storage.set(USER_EMAIL_KEY, "ann@example.com").unwrap();

        let session = Session::restore(&storage);
        assert!(session.is_authenticated);
        assert_eq!(session.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn test_restore_downgrades_blob_without_token() {
        let storage = MemoryStorage::new();
        storage
            .set(SESSION_KEY, r#"{"isAuthenticated":true,"email":"ann@example.com"}"#)
            .unwrap();

        assert_eq!(Session::restore(&storage), Session::default());
    }

    #[test]
    fn test_persisted_store_mirrors_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let store = PersistedSessionStore::restore(storage.clone());

        store.set(true, Some("ann@example.com".into()));
        assert_eq!(
            storage.get(SESSION_KEY).as_deref(),
            Some(r#"{"isAuthenticated":true,"email":"ann@example.com"}"#)
        );
        assert_eq!(storage.get(USER_EMAIL_KEY).as_deref(), Some("ann@example.com"));

        store.clear();
        assert_eq!(store.get(), Session::default());
        assert!(storage.get(SESSION_KEY).is_none());
    }
}
