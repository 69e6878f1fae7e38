//! Persisted key-value storage for session material
//!
//! Mirrors what the browser keeps in `localStorage`. The browser crate and
//! the CLI provide their own backends; [`MemoryStorage`] serves tests and
//! short-lived processes.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::CoreResult;
use crate::token::AccessToken;

/// Key holding the raw access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key holding the signed-in user's email
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Key holding the serialized session blob
pub const SESSION_KEY: &str = "auth-storage";

/// Every key that belongs to a session, removed together on logout
pub const SESSION_KEYS: [&str; 3] = [SESSION_KEY, ACCESS_TOKEN_KEY, USER_EMAIL_KEY];

/// Key-value store that survives restarts
pub trait TokenStorage: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;

    /// Stored access token, if any
    fn access_token(&self) -> Option<AccessToken> {
        self.get(ACCESS_TOKEN_KEY)
            .filter(|raw| !raw.is_empty())
            .map(AccessToken::new)
    }

    /// Replace the stored access token
    fn set_access_token(&self, token: &AccessToken) -> CoreResult<()> {
        self.set(ACCESS_TOKEN_KEY, token.as_str())
    }

    /// Remove every session key, reporting the first failure after trying all
    fn clear_session(&self) -> CoreResult<()> {
        let mut result = Ok(());
        for key in SESSION_KEYS {
            if let Err(e) = self.remove(key) {
                tracing::warn!("Failed to remove {key} from storage: {e}");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_absent() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "").unwrap();
        assert!(storage.access_token().is_none());

        storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.access_token(), Some(AccessToken::new("abc")));
    }

    #[test]
    fn test_clear_session_removes_only_session_keys() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        storage.set(USER_EMAIL_KEY, "ann@example.com").unwrap();
        storage.set(SESSION_KEY, "{}").unwrap();
        storage.set("theme", "dark").unwrap();

        storage.clear_session().unwrap();

        for key in SESSION_KEYS {
            assert!(!storage.contains(key), "{key} should be gone");
        }
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }
}
