//! Access token inspection
//!
//! Tokens are decoded without signature verification. The backend is the
//! only party that checks signatures; the client only needs `exp` to decide
//! whether a refresh is due.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Claims the client reads from an access token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (seconds since the Unix epoch, fractions dropped)
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    /// Subject (user ID), when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Email address, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
}

/// JWT NumericDate: integer or fractional seconds
#[allow(clippy::cast_possible_truncation)]
fn numeric_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    if !seconds.is_finite() {
        return Err(serde::de::Error::custom("NumericDate must be finite"));
    }
    Ok(seconds.floor() as i64)
}

/// Opaque bearer credential issued by the backend
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw token string as stored and sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Decode the payload segment without verifying the signature
    pub fn claims(&self) -> CoreResult<TokenClaims> {
        let mut segments = self.0.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => return Err(CoreError::invalid_token("expected three segments")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| CoreError::invalid_token(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::invalid_token(format!("payload is not valid claims: {e}")))
    }

    /// Whether the token is expired at `now` (seconds since the epoch).
    ///
    /// Undecodable tokens count as expired so they are refreshed or dropped
    /// instead of being sent.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.claims() {
            Ok(claims) => claims.exp <= now,
            Err(e) => {
                tracing::debug!("Treating undecodable access token as expired: {e}");
                true
            }
        }
    }

    /// Whether the token is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

// Never print the credential itself.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

impl From<String> for AccessToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for AccessToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> AccessToken {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        AccessToken::new(format!("{header}.{payload}.c2lnbmF0dXJl"))
    }

    #[test]
    fn test_claims_are_decoded_without_verification() {
        let token = token_with_payload(r#"{"exp":1700000000,"email":"ann@example.com"}"#);
        let claims = token.claims().unwrap();
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.email.as_deref(), Some("ann@example.com"));
        assert_eq!(claims.sub, None);
    }

    #[test]
    fn test_expiry_boundary() {
        let token = token_with_payload(r#"{"exp":1000}"#);
        assert!(!token.is_expired_at(999));
        assert!(token.is_expired_at(1000));
        assert!(token.is_expired_at(1010));
    }

    #[test]
    fn test_fractional_expiry_is_accepted() {
        let token = token_with_payload(r#"{"exp":1700000000.5,"iat":1699999000.25}"#);
        assert_eq!(token.claims().unwrap().exp, 1_700_000_000);
        assert!(!token.is_expired_at(1_699_999_999));
        assert!(token.is_expired_at(1_700_000_001));
    }

    #[test]
    fn test_garbage_counts_as_expired() {
        assert!(AccessToken::new("not-a-token").is_expired_at(0));
        assert!(AccessToken::new("a.%%%.c").is_expired_at(0));
        assert!(token_with_payload(r#"{"sub":"no-exp"}"#).is_expired_at(0));
        assert!(token_with_payload("[]").is_expired_at(0));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
        assert_eq!(token.bearer(), "Bearer secret-value");
    }
}
