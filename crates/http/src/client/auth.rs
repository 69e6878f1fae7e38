//! Authentication API client methods

use gallery_core::Session;
use gallery_core::storage::USER_EMAIL_KEY;
use gallery_core::validation::{
    ForgotPasswordForm, ResetPasswordForm, SigninForm, SignupForm, VerifyForm,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ApiRequest, ClientError, GalleryClient, into_data, into_message};
use crate::types::{ApiResponse, AuthData};

impl GalleryClient {
    /// Register a new account; the server emails a verification code
    pub async fn signup(&self, form: &SignupForm) -> Result<String, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/signup").json(form)?;
        let envelope: ApiResponse<Value> = self.execute_public(request).await?;
        into_message(envelope)
    }

    /// Confirm the emailed code and start a session
    pub async fn verify_email(&self, form: &VerifyForm) -> Result<Session, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/verify-cache").json(form)?;
        let envelope: ApiResponse<AuthData> = self.execute_public(request).await?;
        self.start_session(into_data(envelope)?)
    }

    /// Sign in with email and password
    pub async fn signin(&self, form: &SigninForm) -> Result<Session, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/signin").json(form)?;
        let envelope: ApiResponse<AuthData> = self.execute_public(request).await?;
        self.start_session(into_data(envelope)?)
    }

    /// Ask the server to email a password reset code
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<String, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/forgot-password").json(form)?;
        let envelope: ApiResponse<Value> = self.execute_public(request).await?;
        into_message(envelope)
    }

    /// Set a new password using the emailed code
    pub async fn reset_password(&self, form: &ResetPasswordForm) -> Result<String, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/reset-password").json(form)?;
        let envelope: ApiResponse<Value> = self.execute_public(request).await?;
        into_message(envelope)
    }

    /// Sign out on the server (best effort) and always clear the local session
    pub async fn logout(&self) {
        let token = self.storage.access_token();
        let request = ApiRequest::post("/logout");

        match self.build(&request, token.as_ref()) {
            Ok(builder) => match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Server session closed");
                }
                Ok(response) => {
                    warn!(status = response.status().as_u16(), "Server logout failed");
                }
                Err(e) => warn!("Server logout request failed: {e}"),
            },
            Err(e) => warn!("Could not build logout request: {e}"),
        }

        if let Err(e) = self.storage.clear_session() {
            warn!("Failed to clear persisted session: {e}");
        }
        self.session.clear();
        info!("Signed out");
    }

    fn start_session(&self, data: AuthData) -> Result<Session, ClientError> {
        let token = data.access_token.into();
        self.storage.set_access_token(&token)?;
        self.storage.set(USER_EMAIL_KEY, &data.email)?;
        self.session.set(true, Some(data.email));
        info!("Signed in");
        Ok(self.session.get())
    }
}
