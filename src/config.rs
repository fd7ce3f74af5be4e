//! Gateway configuration loaded from a TOML file.
//!
//! ```toml
//! address = "gateway.example.com:8443"
//! username = "user"
//! password = "secret"
//! use_ssl = true
//! timeout_secs = 30
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors raised while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where and how to reach the SMS gateway
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// `host` or `host:port`; also sent verbatim as the `Host` header
    pub address: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub use_ssl: bool,
    /// Bound on each connect, handshake, read and write wait
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GatewayConfig {
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        GatewayConfig {
            address: address.into(),
            username: username.into(),
            password: password.into(),
            use_ssl: false,
            timeout_secs: None,
        }
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_secs = timeout.map(|t| t.as_secs().max(1));
        self
    }

    /// I/O timeout, `None` to block forever
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

// Keeps the password out of logs
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_ssl", &self.use_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Load the configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    GatewayConfig::from_toml_str(&content)
}
