//! Client configuration and initialization

use crate::config::ApiConfig;
use crate::navigation::BrowserNavigator;
use crate::notifications::CallbackNotifier;
use crate::storage::LocalStorageBackend;
pub use gallery_http::client::error::ClientError;
use gallery_http::GalleryClient;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, PoisonError};

/// Global client instance
static CLIENT: Lazy<Mutex<Option<GalleryClient>>> = Lazy::new(|| Mutex::new(None));

/// Build a client wired to the browser's storage, location and notices
pub fn create_browser_client(base_url: &str) -> Result<GalleryClient, ClientError> {
    GalleryClient::builder()
        .base_url(base_url)
        .login_path(ApiConfig::LOGIN_PATH)
        .storage(Arc::new(LocalStorageBackend))
        .navigator(Arc::new(BrowserNavigator))
        .notifier(Arc::new(CallbackNotifier))
        .build()
}

/// Get the shared client instance, creating it on first use
pub fn gallery_client() -> Result<GalleryClient, ClientError> {
    let mut client_lock = CLIENT.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(client) = client_lock.as_ref() {
        return Ok(client.clone());
    }

    let client = create_browser_client(ApiConfig::BASE_URL)?;
    *client_lock = Some(client.clone());
    Ok(client)
}

/// Drop the shared client so the next call rebuilds it from storage
pub fn reset_client() {
    *CLIENT.lock().unwrap_or_else(PoisonError::into_inner) = None;
}
