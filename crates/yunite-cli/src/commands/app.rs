//! Application commands
//!
//! - `yunite app`: the application behind the token and its authorized guilds
//! - `yunite deauthorize <guild>`: removes the application from a guild
//! - `yunite ws-token`: requests a websocket gateway token

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use yunite_core::domain::GuildId;

use super::CliContext;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct AppCommand {
    /// Include guild names in the authorized guild list
    #[arg(long)]
    pub guild_names: bool,
}

impl AppCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client()?;

        let app = client.get_app(self.guild_names).await?;
        info!(app_id = %app.app.id, guilds = app.authorized_guilds.len(), "Fetched app");

        if matches!(ctx.format, OutputFormat::Json) {
            let json = serde_json::to_value(&app).context("Failed to serialize app")?;
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!("{} ({})", app.app.name, app.app.id));
        formatter.info(&format!("Owner:    {}", app.app.owner_id));
        formatter.info(&format!("Verified: {}", yes_no(app.app.verified)));
        formatter.info(&format!("Public:   {}", yes_no(app.app.public_app)));
        formatter.info("");

        if app.authorized_guilds.is_empty() {
            formatter.info("No guilds have authorized this application");
            return Ok(());
        }

        formatter.info(&format!("Authorized guilds ({}):", app.authorized_guilds.len()));
        for guild in &app.authorized_guilds {
            let name = guild.guild_name.as_deref().unwrap_or("-");
            let permissions: Vec<String> = guild
                .permissions
                .iter()
                .map(|p| format!("{p:?}"))
                .collect();
            formatter.info(&format!(
                "  {}  {}  [{}]",
                guild.guild_id,
                name,
                permissions.join(", ")
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DeauthorizeCommand {
    /// Guild to remove the application from
    pub guild: GuildId,
}

impl DeauthorizeCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client()?;

        let body = client.deauthorize(&self.guild).await?;
        info!(guild = %self.guild, "Deauthorized guild");

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "guild_id": self.guild.as_str(),
                "response": body,
            }));
        } else {
            formatter.success(&format!("Application removed from guild {}", self.guild));
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct WsTokenCommand {}

impl WsTokenCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client()?;

        let token = client.get_ws_token().await?;
        formatter.print_json(&token);
        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
