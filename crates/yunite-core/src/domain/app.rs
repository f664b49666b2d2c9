//! Application payloads
//!
//! Response of `GET /app`: the calling application and the guilds that have
//! authorized it.

use serde::{Deserialize, Serialize};

/// Response from the `/app` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse {
    /// The application owning the API token
    pub app: AppInfo,
    /// Guilds that have authorized the application
    #[serde(default)]
    pub authorized_guilds: Vec<AuthorizedGuild>,
}

/// Basic data about a Yunite application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub public_app: bool,
}

/// A guild that authorized the application, with the granted scopes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedGuild {
    pub guild_id: String,
    /// Guild name, only present when requested with `withGuildNames=true`
    #[serde(default)]
    pub guild_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<GuildPermission>,
}

/// Permission scope granted by a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuildPermission {
    ReadRegistration,
    ReadCustomState,
    BlockUsers,
    ReadTournaments,
    WriteTournaments,
    ReadAcss,
    #[serde(other)]
    Unknown,
}
