//! Client error types

use gallery_core::{CoreError, FieldErrors};
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ErrorBody;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The request did not complete within the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Server returned an error status without a usable body
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Server reported a domain error, possibly tied to form fields
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        fields: FieldErrors,
    },

    /// Authentication failed after the single retry
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The access token could not be refreshed; the session has ended
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Form input rejected before sending
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// Response did not have the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

impl ClientError {
    /// Create error from HTTP status code and response body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.to_string()
                }
            });

        match status.as_u16() {
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            code => match parsed {
                Some(body) if body.has_detail() => Self::Api {
                    status: code,
                    message,
                    fields: body.field_errors(),
                },
                _ => Self::ServerError {
                    status: code,
                    message,
                },
            },
        }
    }

    /// Whether the user has to sign in again
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::AuthenticationFailed(_))
    }

    /// Field-level messages, from local validation or from the server
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(fields) => Some(fields),
            Self::Api { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// HTTP status, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, "Unauthorized"),
            ClientError::AuthenticationFailed(m) if m == "Unauthorized"
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, r#"{"message":"Image not found"}"#),
            ClientError::NotFound(m) if m == "Image not found"
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, ""),
            ClientError::ServerError { status: 502, message } if message == "502 Bad Gateway"
        ));
    }

    #[test]
    fn test_domain_error_keeps_field_paths() {
        let error = ClientError::from_status(
            StatusCode::CONFLICT,
            r#"{"success":false,"message":"Email already exists","path":"email"}"#,
        );
        assert_eq!(error.status(), Some(409));
        assert_eq!(error.to_string(), "Email already exists");
        assert_eq!(
            error.field_errors().and_then(|f| f.get("email")),
            Some("Email already exists")
        );
    }

    #[test]
    fn test_banner_error_has_no_fields() {
        let error = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Invalid credentials"}"#,
        );
        assert!(matches!(error, ClientError::Api { status: 400, .. }));
        assert!(error.field_errors().is_none());
        assert!(!error.is_auth_expired());
    }
}
