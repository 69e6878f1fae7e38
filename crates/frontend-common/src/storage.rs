//! `localStorage` backed token storage

use gallery_core::{CoreError, CoreResult, TokenStorage};
use web_sys::Storage;

/// Persists session keys in the browser's `localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

/// Get localStorage
fn get_local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn storage() -> CoreResult<Storage> {
    get_local_storage().ok_or_else(|| CoreError::storage("localStorage is not available"))
}

impl TokenStorage for LocalStorageBackend {
    fn get(&self, key: &str) -> Option<String> {
        get_local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        storage()?
            .set_item(key, value)
            .map_err(|e| CoreError::storage(format!("failed to write {key}: {e:?}")))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        storage()?
            .remove_item(key)
            .map_err(|e| CoreError::storage(format!("failed to remove {key}: {e:?}")))
    }
}
