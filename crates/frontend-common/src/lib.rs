//! Browser bindings for the gallery API client
//!
//! Implements the host capabilities the client needs on top of
//! `localStorage`, `window.location` and a UI notice callback.

pub mod client;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod notifications;
pub mod storage;

pub use client::{create_browser_client, gallery_client, reset_client};
pub use config::ApiConfig;
pub use navigation::BrowserNavigator;
pub use notifications::{CallbackNotifier, set_notice_callback};
pub use storage::LocalStorageBackend;
