//! Frontend configuration

use gallery_http::DEFAULT_BASE_URL;

/// API configuration baked in at build time
pub struct ApiConfig;

impl ApiConfig {
    /// Backend base URL, overridable with `GALLERY_API_URL` at compile time
    pub const BASE_URL: &'static str = match option_env!("GALLERY_API_URL") {
        Some(url) => url,
        None => DEFAULT_BASE_URL,
    };

    /// Route of the sign-in page
    pub const LOGIN_PATH: &'static str = gallery_core::LOGIN_PATH;
}
