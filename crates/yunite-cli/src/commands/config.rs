//! Config command - View and manage the client configuration
//!
//! Provides the `yunite config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON), token redacted
//! 2. Writes a starter configuration file
//! 3. Sets individual configuration values
//! 4. Validates the configuration file and reports errors

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;
use yunite_core::config::{ClientConfig, Environment};

use super::CliContext;
use crate::output::OutputFormat;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "timeout_secs")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Init { force } => self.execute_init(ctx, *force),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value),
            ConfigCommand::Validate => self.execute_validate(ctx),
        }
    }

    fn execute_show(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let mut config = ctx.config()?;
        if config.api_token.is_some() {
            config.api_token = Some("***".to_string());
        }

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if matches!(ctx.format, OutputFormat::Json) {
            let mut json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            json["resolved_base_url"] = serde_json::Value::from(config.resolved_base_url());
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
            formatter.info("");
            formatter.info(&format!("Requests go to {}", config.resolved_base_url()));
        }

        Ok(())
    }

    fn execute_init(&self, ctx: &CliContext, force: bool) -> Result<()> {
        let formatter = ctx.formatter();
        let path = &ctx.config_path;

        if path.exists() && !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        let config = ClientConfig {
            api_token: ctx.config()?.api_token,
            ..ClientConfig::default()
        };
        config.save(path)?;
        info!(config_path = %path.display(), "Wrote configuration");

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "config_path": path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Wrote {}", path.display()));
            if config.api_token.is_none() {
                formatter.info("Set a token with 'yunite config set api_token <TOKEN>'");
            }
        }
        Ok(())
    }

    fn execute_set(&self, ctx: &CliContext, key: &str, value: &str) -> Result<()> {
        let formatter = ctx.formatter();
        let path = &ctx.config_path;
        let mut config = if path.exists() {
            ClientConfig::load(path)?
        } else {
            ClientConfig::default()
        };

        info!(key = %key, "Setting configuration value");
        apply_config_value(&mut config, key, value)?;

        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!("Invalid value for '{}': {}", key, messages.join("; "));
        }

        config.save(path)?;

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {}", key));
            formatter.info(&format!("Saved to {}", path.display()));
        }
        Ok(())
    }

    fn execute_validate(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let path = &ctx.config_path;

        if !path.exists() {
            formatter.warn(&format!("Configuration file not found at {}", path.display()));
            formatter.info("Run 'yunite config init' to create one.");
            return Ok(());
        }

        let config = ClientConfig::load(path)?;
        let errors = config.validate();

        if matches!(ctx.format, OutputFormat::Json) {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", path.display()));
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(())
    }
}

/// Apply a key/value pair to a ClientConfig
///
/// Optional keys are cleared with an empty value.
fn apply_config_value(config: &mut ClientConfig, key: &str, value: &str) -> Result<()> {
    let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

    match key {
        "api_token" => config.api_token = optional(value),
        "environment" => {
            config.environment = match value {
                "production" => Environment::Production,
                "staging" => Environment::Staging,
                _ => bail!("Expected 'production' or 'staging' for environment"),
            };
        }
        "suppress_logs" => {
            config.suppress_logs = value
                .parse::<bool>()
                .context("Expected true or false for suppress_logs")?;
        }
        "base_url" => config.base_url = optional(value),
        "timeout_secs" => {
            config.timeout_secs = optional(value)
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("Expected a positive integer for timeout_secs")?;
        }
        "max_rate_limit_retries" => {
            config.max_rate_limit_retries = optional(value)
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("Expected a non-negative integer for max_rate_limit_retries")?;
        }
        "default_retry_after_secs" => {
            config.default_retry_after_secs = value
                .parse::<u64>()
                .context("Expected a non-negative integer for default_retry_after_secs")?;
        }
        "log_level" => config.log_level = value.to_string(),
        _ => bail!(
            "Unknown key '{}'. Supported keys: api_token, environment, suppress_logs, \
             base_url, timeout_secs, max_rate_limit_retries, default_retry_after_secs, log_level",
            key
        ),
    }
    Ok(())
}
