//! Yunite API client
//!
//! Typed methods for each documented route. Each one validates its
//! arguments, builds the path and body, and hands the call to the
//! [`Dispatcher`], which owns rate limiting and 429 recovery.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use yunite_api::YuniteClient;
//! use yunite_core::{config::ClientConfigBuilder, domain::GuildId};
//!
//! # async fn example() -> yunite_api::Result<()> {
//! let config = ClientConfigBuilder::new().api_token("my-token").build();
//! let client = YuniteClient::new(&config)?;
//! let guild = GuildId::new("123456789012345678")?;
//! for tournament in client.get_tournaments(&guild).await? {
//!     println!("{:?}", tournament.name);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;
use yunite_core::{
    config::ClientConfig,
    domain::{
        AddTeamRequest, ApiToken, AppResponse, BlockUserRequest, BlockUserResponse, DomainError,
        GuildId, MatchSessionId, Tournament, TournamentId, UserLinksRequest, UserLinksResponse,
    },
};

use crate::{
    dispatcher::{Dispatcher, RequestOptions},
    response::ApiResponse,
    ApiError, Result,
};

/// Client for the Yunite REST API
///
/// Cheap to share by reference; all methods take `&self` and may be called
/// concurrently. Calls to the same route are throttled together, calls to
/// different routes are independent.
#[derive(Debug)]
pub struct YuniteClient {
    dispatcher: Dispatcher,
}

impl YuniteClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    /// [`ApiError::Configuration`] if `config` has no usable API token.
    /// No network activity happens here.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Creates a client from `config`, using `token` in place of
    /// `config.api_token`.
    pub fn with_token(config: &ClientConfig, token: &ApiToken) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::with_token(config, token)?,
        })
    }

    /// The dispatcher behind this client
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Sends an arbitrary request for routes without a typed method.
    ///
    /// `target` is relative to the base URL or an absolute URL. The call is
    /// still rate limited under its own endpoint key.
    pub async fn make_request(
        &self,
        method: Method,
        target: &str,
        options: RequestOptions,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        self.dispatcher.send(method, target, options, body).await
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// `GET /app`: the application and the guilds that authorized it.
    pub async fn get_app(&self, with_guild_names: bool) -> Result<AppResponse> {
        let options = RequestOptions::new().query("withGuildNames", with_guild_names);
        self.get("/app", options).await
    }

    /// `POST /app/deauthorize`: removes the application from a guild.
    pub async fn deauthorize(&self, guild_id: &GuildId) -> Result<Value> {
        let options = RequestOptions::new().query("guildId", guild_id);
        let response = self
            .dispatcher
            .send(Method::POST, "/app/deauthorize", options, None)
            .await?;
        response.value()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// `POST /guild/{guildId}/registration/links`: resolves Discord users to
    /// Epic accounts or the other way round.
    pub async fn get_user_links(
        &self,
        guild_id: &GuildId,
        request: &UserLinksRequest,
    ) -> Result<UserLinksResponse> {
        request.validate()?;
        let path = format!("/guild/{guild_id}/registration/links");
        self.post(&path, request).await
    }

    /// `POST /guild/{guildId}/registration/blocks`: blocks or unblocks a user.
    pub async fn block_user(
        &self,
        guild_id: &GuildId,
        request: &BlockUserRequest,
    ) -> Result<BlockUserResponse> {
        request.validate()?;
        let path = format!("/guild/{guild_id}/registration/blocks");
        self.post(&path, request).await
    }

    // ========================================================================
    // Tournaments
    // ========================================================================

    /// `GET /guild/{guildId}/tournaments`
    pub async fn get_tournaments(&self, guild_id: &GuildId) -> Result<Vec<Tournament>> {
        let path = format!("/guild/{guild_id}/tournaments");
        self.get(&path, RequestOptions::new()).await
    }

    /// `GET /guild/{guildId}/tournaments/{tournamentId}`
    pub async fn get_single_tournament(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
    ) -> Result<Tournament> {
        let path = tournament_path(guild_id, tournament_id, "");
        self.get(&path, RequestOptions::new()).await
    }

    /// `GET .../tournaments/{tournamentId}/leaderboard`
    pub async fn get_leaderboard(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
    ) -> Result<Value> {
        let path = tournament_path(guild_id, tournament_id, "/leaderboard");
        self.get(&path, RequestOptions::new()).await
    }

    /// `GET .../tournaments/{tournamentId}/matches`
    pub async fn get_matches(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
    ) -> Result<Value> {
        let path = tournament_path(guild_id, tournament_id, "/matches");
        self.get(&path, RequestOptions::new()).await
    }

    /// `GET .../matches/{sessionId}?includeLive=true`: leaderboard of one
    /// match, including games still running.
    pub async fn get_single_leaderboard(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
        session_id: &MatchSessionId,
    ) -> Result<Value> {
        let path = tournament_path(guild_id, tournament_id, &format!("/matches/{session_id}"));
        let options = RequestOptions::new().query("includeLive", true);
        self.get(&path, options).await
    }

    /// `GET .../tournaments/{tournamentId}/teams`
    pub async fn get_teams(&self, guild_id: &GuildId, tournament_id: &TournamentId) -> Result<Value> {
        let path = tournament_path(guild_id, tournament_id, "/teams");
        self.get(&path, RequestOptions::new()).await
    }

    /// `POST .../tournaments/{tournamentId}/teams`: adds or updates one team.
    pub async fn add_team(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
        team: &AddTeamRequest,
    ) -> Result<Value> {
        team.validate()?;
        let path = tournament_path(guild_id, tournament_id, "/teams");
        self.post(&path, team).await
    }

    /// `POST .../tournaments/{tournamentId}/teams/bulk`: adds or updates
    /// several teams in one call.
    pub async fn add_teams(
        &self,
        guild_id: &GuildId,
        tournament_id: &TournamentId,
        teams: &[AddTeamRequest],
    ) -> Result<Value> {
        if teams.is_empty() {
            return Err(DomainError::ValidationFailed(
                "at least one team is required".to_string(),
            )
            .into());
        }
        for team in teams {
            team.validate()?;
        }
        let path = tournament_path(guild_id, tournament_id, "/teams/bulk");
        self.post(&path, teams).await
    }

    // ========================================================================
    // Support system
    // ========================================================================

    /// `GET /guild/{guildId}/acss/stats`: ticket statistics, optionally
    /// bounded by unix timestamps.
    pub async fn get_ticket_stats(
        &self,
        guild_id: &GuildId,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Value> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(DomainError::ValidationFailed(format!(
                    "`from` ({from}) must not be after `to` ({to})"
                ))
                .into());
            }
        }

        let mut options = RequestOptions::new();
        if let Some(from) = from {
            options = options.query("from", from);
        }
        if let Some(to) = to {
            options = options.query("to", to);
        }

        let path = format!("/guild/{guild_id}/acss/stats");
        self.get(&path, options).await
    }

    /// `GET /websocket-token`: a short-lived token for the websocket gateway.
    pub async fn get_ws_token(&self) -> Result<Value> {
        self.get("/websocket-token", RequestOptions::new()).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        debug!(path, "GET");
        let response = self
            .dispatcher
            .send(Method::GET, path, options, None)
            .await?;
        response.json()
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("failed to encode body: {e}")))?;
        let response = self
            .dispatcher
            .send(Method::POST, path, RequestOptions::new(), Some(&body))
            .await?;
        response.json()
    }
}

fn tournament_path(guild_id: &GuildId, tournament_id: &TournamentId, suffix: &str) -> String {
    format!("/guild/{guild_id}/tournaments/{tournament_id}{suffix}")
}
