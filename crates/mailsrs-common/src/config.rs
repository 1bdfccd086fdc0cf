//! Configuration for MailSRS

use crate::types::Separator;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured secret
pub const SECRET_ENV_VAR: &str = "MAILSRS_SECRET";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Rewriting configuration
    pub srs: SrsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SRS rewriting configuration
///
/// Immutable once handed to the rewriter. The secret is shared by every
/// forwarder that has to reverse addresses produced by this one.
#[derive(Clone, Deserialize)]
pub struct SrsConfig {
    /// HMAC key used to sign rewritten addresses
    #[serde(default)]
    pub secret: String,

    /// Separator written directly after the SRS0/SRS1 tag
    #[serde(default)]
    pub separator: Separator,

    /// Maximum age of an SRS0 address in days
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

fn default_max_age() -> u32 {
    21
}

impl SrsConfig {
    /// Create a configuration with the default separator and max age
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            separator: Separator::default(),
            max_age: default_max_age(),
        }
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_max_age(mut self, days: u32) -> Self {
        self.max_age = days;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> crate::Result<()> {
        if self.secret.is_empty() {
            return Err(crate::Error::Config("srs.secret must be set".to_string()));
        }
        if self.max_age == 0 {
            return Err(crate::Error::Config(
                "srs.max_age must be a positive number of days".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SrsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrsConfig")
            .field("secret", &"<redacted>")
            .field("separator", &self.separator)
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse(&content)
    }

    /// Locations searched by [`Config::load`], in order
    pub fn default_paths() -> [PathBuf; 2] {
        [
            PathBuf::from("./mailsrs.toml"),
            PathBuf::from("/etc/mailsrs/mailsrs.toml"),
        ]
    }

    /// Load the first of `paths` that exists
    ///
    /// Returns `Ok(None)` when none exists. Read and parse errors of an
    /// existing file are returned as is.
    pub fn load_from(paths: &[PathBuf]) -> crate::Result<Option<Self>> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path).map(Some),
            None => Ok(None),
        }
    }

    /// Load configuration from the default locations
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::default_paths())?
            .ok_or_else(|| crate::Error::Config("No configuration file found".to_string()))
    }

    /// Override the secret from `MAILSRS_SECRET` when it is set
    pub fn apply_env(self) -> Self {
        self.with_secret_override(std::env::var(SECRET_ENV_VAR).ok())
    }

    /// Replace the secret with `secret` unless it is absent or empty
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.srs.secret = secret;
        }
        self
    }
}
