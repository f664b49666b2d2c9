//! Tournament commands
//!
//! Read-only views of a guild's tournaments. `tournaments` and `tournament`
//! print a summary in human mode; the other commands print the payload as
//! returned by the API.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use yunite_core::domain::{GuildId, MatchSessionId, Tournament, TournamentId};

use super::CliContext;
use crate::output::{OutputFormat, OutputFormatter};

#[derive(Debug, Args)]
pub struct TournamentsCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
}

impl TournamentsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client()?;

        let tournaments = client.get_tournaments(&self.guild).await?;
        info!(guild = %self.guild, count = tournaments.len(), "Fetched tournaments");

        if matches!(ctx.format, OutputFormat::Json) {
            let json =
                serde_json::to_value(&tournaments).context("Failed to serialize tournaments")?;
            formatter.print_json(&json);
            return Ok(());
        }

        if tournaments.is_empty() {
            formatter.info(&format!("No tournaments in guild {}", self.guild));
            return Ok(());
        }

        formatter.success(&format!(
            "{} tournament{} in guild {}",
            tournaments.len(),
            if tournaments.len() == 1 { "" } else { "s" },
            self.guild
        ));
        for tournament in &tournaments {
            formatter.info(&summary_line(tournament));
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TournamentCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
    /// Tournament ID
    pub tournament: TournamentId,
}

impl TournamentCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client()?;

        let tournament = client
            .get_single_tournament(&self.guild, &self.tournament)
            .await?;

        if matches!(ctx.format, OutputFormat::Json) {
            let json =
                serde_json::to_value(&tournament).context("Failed to serialize tournament")?;
            formatter.print_json(&json);
            return Ok(());
        }

        print_tournament(&*formatter, &tournament);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct LeaderboardCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
    /// Tournament ID
    pub tournament: TournamentId,
}

impl LeaderboardCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let leaderboard = client
            .get_leaderboard(&self.guild, &self.tournament)
            .await?;
        ctx.formatter().print_json(&leaderboard);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct MatchesCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
    /// Tournament ID
    pub tournament: TournamentId,
}

impl MatchesCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let matches = client.get_matches(&self.guild, &self.tournament).await?;
        ctx.formatter().print_json(&matches);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct MatchCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
    /// Tournament ID
    pub tournament: TournamentId,
    /// Match session ID
    pub session: MatchSessionId,
}

impl MatchCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let leaderboard = client
            .get_single_leaderboard(&self.guild, &self.tournament, &self.session)
            .await?;
        ctx.formatter().print_json(&leaderboard);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TeamsCommand {
    /// Guild (Discord server) ID
    pub guild: GuildId,
    /// Tournament ID
    pub tournament: TournamentId,
}

impl TeamsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let teams = client.get_teams(&self.guild, &self.tournament).await?;
        ctx.formatter().print_json(&teams);
        Ok(())
    }
}

/// One-line summary: `<id>  <name>  (<start> - <end>)`
fn summary_line(tournament: &Tournament) -> String {
    let id = tournament.id.as_deref().unwrap_or("?");
    let name = tournament.name.as_deref().unwrap_or("(unnamed)");
    match (&tournament.start_date, &tournament.end_date) {
        (Some(start), Some(end)) => format!("{id}  {name}  ({start} - {end})"),
        (Some(start), None) => format!("{id}  {name}  (from {start})"),
        _ => format!("{id}  {name}"),
    }
}

fn print_tournament(formatter: &dyn OutputFormatter, tournament: &Tournament) {
    formatter.success(&summary_line(tournament));

    if let Some(description) = &tournament.description {
        formatter.info(description);
    }
    if let Some(size) = tournament.queue_size {
        formatter.info(&format!("Team size:      {size}"));
    }
    if let Some(max) = tournament.max_games_scored {
        formatter.info(&format!("Games scored:   {max}"));
    }
    if let Some(max) = tournament.max_games_playable {
        formatter.info(&format!("Games playable: {max}"));
    }
    if !tournament.match_template.is_empty() {
        formatter.info(&format!(
            "Match templates: {}",
            tournament.match_template.len()
        ));
    }
}
