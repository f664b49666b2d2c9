//! Passthrough request command
//!
//! `yunite request <METHOD> <PATH>` sends an arbitrary call through the
//! same rate-limited dispatcher as the typed commands. Useful for routes
//! without a dedicated command.

use anyhow::{bail, Context, Result};
use clap::Args;
use reqwest::Method;
use tracing::info;
use yunite_api::RequestOptions;

use super::CliContext;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct RequestCommand {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API base URL, or an absolute URL
    pub path: String,

    /// Query parameter as key=value (can be repeated)
    #[arg(short = 'Q', long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,
}

impl RequestCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let method = parse_method(&self.method)?;

        let mut options = RequestOptions::new();
        for pair in &self.query {
            let (key, value) = parse_query_pair(pair)?;
            options = options.query(key, value);
        }

        let body = self
            .data
            .as_deref()
            .map(|raw| serde_json::from_str::<serde_json::Value>(raw))
            .transpose()
            .context("Request body is not valid JSON")?;

        let client = ctx.client()?;
        let response = client
            .make_request(method, &self.path, options, body.as_ref())
            .await?;
        info!(path = %self.path, status = response.status().as_u16(), "Request completed");

        match response.value() {
            Ok(value) => formatter.print_json(&value),
            Err(_) if matches!(ctx.format, OutputFormat::Json) => {
                formatter.print_json(&serde_json::json!({
                    "status": response.status().as_u16(),
                    "body": response.text(),
                }));
            }
            Err(_) => println!("{}", response.text()),
        }
        Ok(())
    }
}

fn parse_method(raw: &str) -> Result<Method> {
    let method = Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{raw}'"))?;
    Ok(method)
}

fn parse_query_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Query parameter '{pair}' must be KEY=VALUE"),
    }
}
