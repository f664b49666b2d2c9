//! Ticket statistics command
//!
//! `yunite ticket-stats <guild> [--from <unix>] [--to <unix>]` prints the
//! support-system statistics of a guild, optionally restricted to a range
//! of unix timestamps.

use anyhow::Result;
use clap::Args;
use yunite_core::domain::GuildId;

use super::CliContext;

#[derive(Debug, Args)]
pub struct TicketStatsCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,

    /// Start of the range (unix timestamp, seconds)
    #[arg(long)]
    pub from: Option<i64>,

    /// End of the range (unix timestamp, seconds)
    #[arg(long)]
    pub to: Option<i64>,
}

impl TicketStatsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let stats = client
            .get_ticket_stats(&self.guild, self.from, self.to)
            .await?;
        ctx.formatter().print_json(&stats);
        Ok(())
    }
}
