//! CLI configuration
//!
//! Built-in defaults, then the config file, then `GALLERY_*` environment
//! variables (`GALLERY_API__BASE_URL=...`).

use anyhow::{Result, bail};
use config::{Config, Environment, File};
use gallery_core::LOGIN_PATH;
use gallery_http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Backend connection settings
    pub api: ApiConfig,

    /// Path the client is sent to when the session ends
    pub login_path: String,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the user API, e.g. `http://localhost:5000/api/user`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Custom User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT.as_secs(),
                user_agent: None,
            },
            login_path: LOGIN_PATH.to_string(),
        }
    }
}

/// `<config dir>/gallery/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gallery").join("config.toml"))
}

fn environment() -> Environment {
    Environment::with_prefix("GALLERY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl GalleryConfig {
    /// Load configuration from an explicit file or the default location
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a source cannot be
    /// parsed, or the result fails validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, environment())
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("login_path", defaults.login_path)?;

        match path {
            Some(path) => builder = builder.add_source(File::from(path)),
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api.base_url must be an http(s) URL, got {}", self.api.base_url);
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than zero");
        }
        if !self.login_path.starts_with('/') {
            bail!("login_path must start with '/'");
        }
        Ok(())
    }
}
