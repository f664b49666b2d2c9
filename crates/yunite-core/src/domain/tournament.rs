//! Tournament payloads
//!
//! Shapes returned by `GET /guild/{guildId}/tournaments[/{tournamentId}]`
//! and the team body accepted by the `teams` and `teams/bulk` routes.
//! Nearly every field is optional: Yunite omits or nulls whatever a guild
//! has not configured.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::registration::Platform;

/// A tournament configured in a guild
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub queue_size: Option<u32>,
    pub point_system: Option<PointSystem>,
    pub consensus_min: Option<u32>,
    pub require_all_members_on_discord: Option<bool>,
    pub recreate_team_on_team_change: Option<bool>,
    pub allow_fill_only_sessions: Option<bool>,
    pub allow_rank_duplicates: Option<bool>,
    pub embedded_twitch_user: Option<String>,
    #[serde(default)]
    pub event_links: Vec<serde_json::Value>,
    pub max_games_scored: Option<u32>,
    pub max_games_playable: Option<u32>,
    #[serde(default)]
    pub tiebreakers: Vec<Tiebreaker>,
    pub allow_team_mate_swap: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub match_template: Vec<MatchTemplate>,
}

/// Scoring rules of a tournament
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSystem {
    pub points_per_kill: Option<f64>,
    /// Placement table; its layout is not documented, so it is kept raw
    #[serde(default)]
    pub points_per_placement: serde_json::Value,
    pub kill_cap: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tiebreaker {
    Wins,
    AverageEliminations,
    AveragePlacement,
    AverageTimeSurvived,
    #[serde(other)]
    Unknown,
}

/// Matchmaking region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Nae,
    Naw,
    Eu,
    Br,
    Oce,
    Asia,
    Me,
    #[serde(other)]
    Unknown,
}

/// Template used to spawn the matches of a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTemplate {
    #[serde(rename = "type")]
    pub match_type: String,
    pub region: Option<Region>,
    pub rule_text: Option<String>,
    pub leak_detection_enabled: Option<bool>,
    pub use_complex_code: Option<bool>,
    #[serde(default)]
    pub priority_levels: Vec<PriorityLevel>,
    #[serde(default)]
    pub allowed_platforms: Vec<Platform>,
    pub role_to_ping: Option<String>,
    #[serde(rename = "resultChannelID")]
    pub result_channel_id: Option<String>,
    #[serde(rename = "signUpChannelID")]
    pub sign_up_channel_id: Option<String>,
    #[serde(rename = "leakDetectionChannelID")]
    pub leak_detection_channel_id: Option<String>,
    #[serde(rename = "liveTrackingChannelID")]
    pub live_tracking_channel_id: Option<String>,
    #[serde(rename = "rejectionLogChannelID")]
    pub rejection_log_channel_id: Option<String>,
    pub max_players: Option<u32>,
}

/// Queue priority granted to members of the listed roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLevel {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub timeout: Option<u64>,
}

// ============================================================================
// Teams
// ============================================================================

/// A team member, identified by Discord ID, Epic ID or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPlayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<String>,
}

impl TeamPlayer {
    pub fn discord(id: impl Into<String>) -> Self {
        Self {
            discord_id: Some(id.into()),
            epic_id: None,
        }
    }

    pub fn epic(id: impl Into<String>) -> Self {
        Self {
            discord_id: None,
            epic_id: Some(id.into()),
        }
    }
}

/// Body for adding or updating a team; `id` is set when updating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<TeamPlayer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualified: Option<bool>,
}

impl AddTeamRequest {
    /// Every listed player needs at least one identifier
    pub fn validate(&self) -> Result<(), DomainError> {
        let players = self.players.as_deref().unwrap_or_default();
        if players
            .iter()
            .any(|p| p.discord_id.is_none() && p.epic_id.is_none())
        {
            return Err(DomainError::ValidationFailed(
                "every team player needs a discordId or an epicId".to_string(),
            ));
        }
        Ok(())
    }
}
