//! Wire types exchanged with the gallery backend

use gallery_core::{FieldErrors, ImageOrder};
use serde::{Deserialize, Serialize};

/// Envelope every endpoint answers with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload of a successful sign-in or email verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: String,
    pub email: String,
}

/// Response of `/refresh-token`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body of `/change-order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOrderRequest {
    pub image_order: Vec<ImageOrder>,
}

/// Field-level error reported by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerFieldError {
    #[serde(alias = "field")]
    pub path: String,
    #[serde(alias = "msg")]
    pub message: String,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Field the message applies to
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub errors: Vec<ServerFieldError>,
}

impl ErrorBody {
    /// Human-readable message, preferring `message` over `error`
    pub fn message(&self) -> Option<String> {
        self.message
            .as_ref()
            .or(self.error.as_ref())
            .filter(|m| !m.trim().is_empty())
            .cloned()
    }

    /// Server field metadata folded into form errors
    pub fn field_errors(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        if let (Some(path), Some(message)) = (&self.path, self.message()) {
            fields.add(path.clone(), message);
        }
        for error in &self.errors {
            fields.add(error.path.clone(), error.message.clone());
        }
        fields
    }

    /// Whether the body carries anything worth showing
    pub fn has_detail(&self) -> bool {
        self.message().is_some() || !self.errors.is_empty()
    }
}
