//! Gallery HTTP client
//!
//! [`GalleryClient`] injects the stored access token into every request,
//! refreshes an expired token before sending, and on a 401 refreshes and
//! resends once. When the session cannot be recovered it clears local
//! session state and sends the user to the sign-in view.

pub mod auth;
pub mod error;
pub mod images;
pub mod request;

use error::ClientError;
use gallery_core::navigation::SESSION_EXPIRED_MESSAGE;
use gallery_core::{
    AccessToken, LOGIN_PATH, LogNavigator, LogNotifier, MemoryStorage, Navigator, NoticeLevel,
    Notifier, PersistedSessionStore, Session, SessionStore, TokenStorage,
};
use reqwest::{Client, ClientBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use request::{ApiRequest, FormPart, RequestBody};

use crate::types::{ApiResponse, RefreshResponse};

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/user";

/// Per-request budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const REFRESH_PATH: &str = "/refresh-token";

/// Gallery API client
#[derive(Clone)]
pub struct GalleryClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    login_path: String,
    storage: Arc<dyn TokenStorage>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl GalleryClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> GalleryClientBuilder {
        GalleryClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Budget applied to every request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.get().is_authenticated
    }

    /// Persisted storage backing this client
    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a descriptor into a ready-to-send request
    fn build(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut builder = self
            .client
            .request(request.method().clone(), self.url(request.path()))
            .timeout(self.timeout);

        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token.bearer());
        }

        request.body().apply(builder)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self.build(request, token)?.send().await?;
        debug!(
            method = %request.method(),
            path = request.path(),
            status = response.status().as_u16(),
            retried = request.is_retried(),
            "API response"
        );
        Ok(response)
    }

    /// Token to attach before sending, refreshing it first when expired
    async fn authorize(&self) -> Result<Option<AccessToken>, ClientError> {
        let Some(token) = self.storage.access_token() else {
            return Ok(None);
        };

        if !token.is_expired() {
            return Ok(Some(token));
        }

        debug!("Stored access token expired, refreshing before sending");
        match self.refresh_access_token().await {
            Some(fresh) => Ok(Some(fresh)),
            None => {
                self.end_session(false);
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// Send an authenticated request, refreshing and resending once on 401
    pub async fn send(&self, mut request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        let token = self.authorize().await?;
        let response = self.dispatch(&request, token.as_ref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || request.is_retried() {
            return Ok(response);
        }

        request.mark_retried();
        debug!(path = request.path(), "Got 401, refreshing access token");
        match self.refresh_access_token().await {
            Some(fresh) => self.dispatch(&request, Some(&fresh)).await,
            None => {
                self.end_session(true);
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// Send a request that needs no authentication
    pub async fn send_public(&self, request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        self.dispatch(&request, None).await
    }

    /// Execute an authenticated request and decode the response
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        decode_response(response).await
    }

    /// Execute a public request and decode the response
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let response = self.send_public(request).await?;
        decode_response(response).await
    }

    /// Obtain a new access token using the refresh cookie.
    ///
    /// Failures are logged and reported as `None`; the caller decides what
    /// happens next.
    pub async fn refresh_access_token(&self) -> Option<AccessToken> {
        let request = self
            .client
            .post(self.url(REFRESH_PATH))
            .timeout(self.timeout);
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Token refresh request failed: {e}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Token refresh rejected");
            return None;
        }

        let body = match response.json::<RefreshResponse>().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Token refresh returned an unreadable body: {e}");
                return None;
            }
        };

        let token = match body {
            RefreshResponse {
                success: true,
                access_token: Some(raw),
            } if !raw.is_empty() => AccessToken::new(raw),
            _ => {
                warn!("Token refresh did not return an access token");
                return None;
            }
        };

        if let Err(e) = self.storage.set_access_token(&token) {
            warn!("Failed to persist refreshed access token: {e}");
        }
        let email = self
            .session
            .get()
            .email
            .or_else(|| token.claims().ok().and_then(|claims| claims.email));
        self.session.set(true, email);
        debug!("Access token refreshed");

        Some(token)
    }

    /// Tear down the local session after an unrecoverable auth failure
    fn end_session(&self, notify: bool) {
        warn!("Session could not be refreshed, signing out locally");
        self.session.set(false, None);
        if let Err(e) = self.storage.clear_session() {
            warn!("Failed to clear persisted session: {e}");
        }
        if notify {
            self.notifier
                .notify(NoticeLevel::Error, SESSION_EXPIRED_MESSAGE);
        }
        self.navigator.navigate(&self.login_path);
    }
}

/// Decode a response body, mapping error statuses to [`ClientError`]
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status, &body))
    }
}

/// Payload of a successful envelope
fn into_data<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
    if !envelope.success {
        return Err(envelope_failure(envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| ClientError::InvalidResponse("response has no data".into()))
}

/// Message of a successful envelope
fn into_message<T>(envelope: ApiResponse<T>) -> Result<String, ClientError> {
    if !envelope.success {
        return Err(envelope_failure(envelope.message));
    }
    Ok(envelope.message.unwrap_or_default())
}

fn envelope_failure(message: Option<String>) -> ClientError {
    ClientError::Api {
        status: StatusCode::OK.as_u16(),
        message: message.unwrap_or_else(|| "Request was not successful".into()),
        fields: Default::default(),
    }
}

/// Builder for GalleryClient
#[derive(Default)]
pub struct GalleryClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    login_path: Option<String>,
    storage: Option<Arc<dyn TokenStorage>>,
    session: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl GalleryClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the path to navigate to when the session ends
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the persisted storage
    pub fn storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the session store
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the navigator
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Set the notifier
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GalleryClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.timeout(timeout).cookie_store(true);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| concat!("gallery-client/", env!("CARGO_PKG_VERSION")).into()),
        );

        let client = client_builder.build()?;

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let session = self
            .session
            .unwrap_or_else(|| Arc::new(PersistedSessionStore::restore(storage.clone())));

        Ok(GalleryClient {
            client,
            base_url,
            timeout,
            login_path: self.login_path.unwrap_or_else(|| LOGIN_PATH.into()),
            storage,
            session,
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
        })
    }
}
