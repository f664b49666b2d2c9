//! Configuration module for the Yunite client.
//!
//! Provides the typed [`ClientConfig`] that maps to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ApiToken, DomainError};

/// Base URL of the production API
pub const PRODUCTION_BASE_URL: &str = "https://yunite.xyz/api/v3";

/// Base URL of the staging (beta) API
pub const STAGING_BASE_URL: &str = "https://beta.yunite.xyz/api/v3";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Target deployment of the Yunite API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    /// Base URL requests are resolved against.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Staging => STAGING_BASE_URL,
        }
    }
}

/// Top-level configuration for a Yunite client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Secret sent as `Y-Api-Token`. Required to construct a client.
    pub api_token: Option<String>,
    /// Production or staging API.
    pub environment: Environment,
    /// Silence the advisory line logged when a request hits HTTP 429.
    pub suppress_logs: bool,
    /// Overrides the environment's base URL (proxies, mock servers).
    pub base_url: Option<String>,
    /// Per-request transport timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Maximum consecutive 429 retries for one call. `None` retries forever.
    pub max_rate_limit_retries: Option<u32>,
    /// Wait applied when a 429 carries no reset or `Retry-After` header.
    pub default_retry_after_secs: u64,
    /// Log level used by the CLI when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            environment: Environment::Production,
            suppress_logs: false,
            base_url: None,
            timeout_secs: None,
            max_rate_limit_retries: None,
            default_retry_after_secs: 1,
            log_level: "info".to_string(),
        }
    }
}

/// Errors raised when a configuration cannot produce a working client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API token was supplied
    #[error("an API token is required to construct a client")]
    MissingToken,

    /// The API token is malformed
    #[error(transparent)]
    InvalidToken(#[from] DomainError),

    /// One or more fields failed validation
    #[error("invalid configuration: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientConfig {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ClientConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`ClientConfig::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the configuration as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/yunite/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("yunite")
            .join("config.yaml")
    }

    /// Base URL after applying the explicit override, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// The validated API token.
    ///
    /// # Errors
    /// [`ConfigError::MissingToken`] when no token is set, or
    /// [`ConfigError::InvalidToken`] when it cannot be sent as a header.
    pub fn api_token(&self) -> Result<ApiToken, ConfigError> {
        let raw = self.api_token.as_deref().ok_or(ConfigError::MissingToken)?;
        Ok(ApiToken::new(raw)?)
    }
}

// ---------------------------------------------------------------------------
// ClientConfig::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field, e.g. `"timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `log_level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `default_retry_after_secs`.
const MAX_DEFAULT_RETRY_AFTER_SECS: u64 = 3600;

impl ClientConfig {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. A missing token is
    /// not reported here because it may be supplied later (for example from
    /// the environment); it is enforced when the client is constructed.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(token) = &self.api_token {
            if let Err(e) = ApiToken::new(token.as_str()) {
                errors.push(ValidationError {
                    field: "api_token".into(),
                    message: e.to_string(),
                });
            }
        }

        if let Some(base_url) = &self.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                errors.push(ValidationError {
                    field: "base_url".into(),
                    message: format!("must be an http(s) URL, got '{base_url}'"),
                });
            }
        }

        if self.timeout_secs == Some(0) {
            errors.push(ValidationError {
                field: "timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.default_retry_after_secs > MAX_DEFAULT_RETRY_AFTER_SECS {
            errors.push(ValidationError {
                field: "default_retry_after_secs".into(),
                message: format!("must not exceed {MAX_DEFAULT_RETRY_AFTER_SECS}"),
            });
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            errors.push(ValidationError {
                field: "log_level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.log_level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ClientConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`ClientConfig`] programmatically.
///
/// Starts from [`ClientConfig::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use yunite_core::config::{ClientConfigBuilder, Environment};
///
/// let config = ClientConfigBuilder::new()
///     .api_token("my-secret")
///     .environment(Environment::Staging)
///     .suppress_logs(true)
///     .build();
/// assert_eq!(config.resolved_base_url(), "https://beta.yunite.xyz/api/v3");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder initialised with [`ClientConfig::default`] values.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn suppress_logs(mut self, suppress: bool) -> Self {
        self.config.suppress_logs = suppress;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = Some(seconds);
        self
    }

    pub fn max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.config.max_rate_limit_retries = Some(retries);
        self
    }

    pub fn default_retry_after_secs(mut self, seconds: u64) -> Self {
        self.config.default_retry_after_secs = seconds;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Consume the builder and return the finished [`ClientConfig`].
    pub fn build(self) -> ClientConfig {
        self.config
    }

    /// Build and validate in one step.
    pub fn build_validated(self) -> Result<ClientConfig, ConfigError> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
