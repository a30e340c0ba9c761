//! Session configuration.
//!
//! A [`ClientConfig`] holds everything needed to talk to one server: base URL,
//! credentials, timeout, proxy and the page size used for read iteration.
//! It can be loaded from a JSON file; missing fields take their defaults.
//!
//! ```json
//! {
//!   "server_url": "http://localhost:8001/megan6server",
//!   "user": "guest",
//!   "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$...",
//!   "timeout_secs": 30,
//!   "proxy": { "host": "proxy.example.org", "port": 3128 },
//!   "page_size": 100
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::auth::HasherConfig;
use crate::utils::validation::{
    normalize_base_url, validate_page_size, ValidationError, DEFAULT_PAGE_SIZE,
};

/// Default connect and request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of redirects followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// HTTP proxy to route requests through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
}

impl ProxySettings {
    /// Proxy URL understood by the HTTP client
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Settings of one client session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. `http://localhost:8001/megan6server`
    pub server_url: String,

    pub user: String,

    /// Credential hash sent in place of the password
    pub password_hash: String,

    /// Connect and request timeout in seconds
    pub timeout_secs: u64,

    /// Direct connection when `None`
    pub proxy: Option<ProxySettings>,

    /// Reads fetched per round trip during iteration
    pub page_size: usize,

    pub max_redirects: usize,

    /// Salt and costs used when a raw password has to be hashed
    pub hasher: HasherConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            user: String::new(),
            password_hash: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            hasher: HasherConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password_hash: impl Into<String>) -> Self {
        self.user = user.into();
        self.password_hash = password_hash.into();
        self
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read or
    /// `ConfigError::Parse` if it is not a valid config document.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that the settings describe a usable session
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a bad URL, page size or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_base_url(&self.server_url)?;
        validate_page_size(self.page_size)?;
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("proxy", &self.proxy)
            .field("page_size", &self.page_size)
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}
