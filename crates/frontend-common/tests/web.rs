//! Browser tests for the storage and client adapters

#![cfg(target_arch = "wasm32")]

use gallery_core::TokenStorage;
use gallery_core::storage::{ACCESS_TOKEN_KEY, SESSION_KEY, USER_EMAIL_KEY};
use gallery_frontend_common::{LocalStorageBackend, create_browser_client};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let storage = LocalStorageBackend;
    storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
    storage.set(USER_EMAIL_KEY, "ann@example.com").unwrap();
    storage.set(SESSION_KEY, "{}").unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));

    storage.clear_session().unwrap();
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert!(storage.get(USER_EMAIL_KEY).is_none());
    assert!(storage.get(SESSION_KEY).is_none());
}

#[wasm_bindgen_test]
fn browser_client_restores_session_from_local_storage() {
    let storage = LocalStorageBackend;
    storage.set(ACCESS_TOKEN_KEY, "header.payload.signature").unwrap();
    storage.set(USER_EMAIL_KEY, "ann@example.com").unwrap();

    let client = create_browser_client("http://localhost:5000/api/user").unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.session().email.as_deref(), Some("ann@example.com"));

    storage.clear_session().unwrap();
}

#[wasm_bindgen_test]
fn browser_client_applies_default_request_budget() {
    let client = create_browser_client("http://localhost:5000/api/user").unwrap();
    assert_eq!(client.timeout(), gallery_http::DEFAULT_TIMEOUT);
}
