//! CLI command implementations
//!
//! Every command receives a [`CliContext`] carrying the output format, the
//! config file location and the overrides given on the command line.

pub mod app;
pub mod config;
pub mod request;
pub mod stats;
pub mod tournaments;

use std::path::PathBuf;

use anyhow::{Context, Result};
use yunite_api::YuniteClient;
use yunite_core::config::{ClientConfig, Environment};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Global options shared by all commands
#[derive(Debug)]
pub struct CliContext {
    pub format: OutputFormat,
    pub config_path: PathBuf,
    token: Option<String>,
    staging: bool,
    quiet: bool,
}

impl CliContext {
    pub fn new(
        format: OutputFormat,
        config_path: Option<PathBuf>,
        token: Option<String>,
        staging: bool,
        quiet: bool,
    ) -> Self {
        Self {
            format,
            config_path: config_path.unwrap_or_else(ClientConfig::default_path),
            token,
            staging,
            quiet,
        }
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(matches!(self.format, OutputFormat::Json))
    }

    /// Log filter from the config file, falling back to the default level.
    pub fn log_level(&self) -> String {
        ClientConfig::load_or_default(&self.config_path).log_level
    }

    /// Loads the config file, if present, and applies command-line overrides.
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// malformed one is an error.
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = if self.config_path.exists() {
            ClientConfig::load(&self.config_path)?
        } else {
            ClientConfig::default()
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(token) = &self.token {
            config.api_token = Some(token.clone());
        }
        if self.staging {
            config.environment = Environment::Staging;
        }
        if self.quiet {
            config.suppress_logs = true;
        }
    }

    /// Builds an API client from the effective configuration.
    pub fn client(&self) -> Result<YuniteClient> {
        let config = self.config()?;
        YuniteClient::new(&config).with_context(|| {
            format!(
                "Cannot create client (set --token, YUNITE_API_TOKEN or api_token in {})",
                self.config_path.display()
            )
        })
    }
}
