//! Yunite CLI - Command-line interface for the Yunite API
//!
//! Provides commands for:
//! - Inspecting the application and its authorized guilds
//! - Listing tournaments, leaderboards, matches and teams
//! - Reading support-system statistics
//! - Sending arbitrary API requests
//! - Managing the client configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yunite_api::ApiError;

mod commands;
mod output;

use commands::{
    app::{AppCommand, DeauthorizeCommand, WsTokenCommand},
    config::ConfigCommand,
    request::RequestCommand,
    stats::TicketStatsCommand,
    tournaments::{
        LeaderboardCommand, MatchCommand, MatchesCommand, TeamsCommand, TournamentCommand,
        TournamentsCommand,
    },
    CliContext,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "yunite", version, about = "Command-line client for the Yunite API")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API token, overriding the config file
    #[arg(long, env = "YUNITE_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Target the staging environment
    #[arg(long, global = true)]
    staging: bool,

    /// Minimal output; also silences rate-limit advisories
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the application and the guilds that authorized it
    App(AppCommand),
    /// Remove the application from a guild
    Deauthorize(DeauthorizeCommand),
    /// List the tournaments of a guild
    Tournaments(TournamentsCommand),
    /// Show a single tournament
    Tournament(TournamentCommand),
    /// Show the leaderboard of a tournament
    Leaderboard(LeaderboardCommand),
    /// List the matches of a tournament
    Matches(MatchesCommand),
    /// Show the leaderboard of a single match
    Match(MatchCommand),
    /// List the teams of a tournament
    Teams(TeamsCommand),
    /// Show support-system ticket statistics
    TicketStats(TicketStatsCommand),
    /// Request a websocket token
    WsToken(WsTokenCommand),
    /// Send an arbitrary API request
    Request(RequestCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let ctx = CliContext::new(format, cli.config, cli.token, cli.staging, cli.quiet);

    // Setup tracing
    let filter = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => ctx.log_level(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::App(cmd) => cmd.execute(&ctx).await,
        Commands::Deauthorize(cmd) => cmd.execute(&ctx).await,
        Commands::Tournaments(cmd) => cmd.execute(&ctx).await,
        Commands::Tournament(cmd) => cmd.execute(&ctx).await,
        Commands::Leaderboard(cmd) => cmd.execute(&ctx).await,
        Commands::Matches(cmd) => cmd.execute(&ctx).await,
        Commands::Match(cmd) => cmd.execute(&ctx).await,
        Commands::Teams(cmd) => cmd.execute(&ctx).await,
        Commands::TicketStats(cmd) => cmd.execute(&ctx).await,
        Commands::WsToken(cmd) => cmd.execute(&ctx).await,
        Commands::Request(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
    };

    // Remote errors carry the server's body; show it instead of a bare message.
    if let Err(err) = &result {
        if let Some(response) = err.downcast_ref::<ApiError>().and_then(ApiError::response) {
            ctx.formatter().remote_error(response);
            std::process::exit(1);
        }
    }
    result
}
