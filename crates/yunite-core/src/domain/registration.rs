//! Registration payloads
//!
//! Bodies and responses for the guild registration endpoints:
//! - `POST /guild/{guildId}/registration/links`
//! - `POST /guild/{guildId}/registration/blocks`

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Which side of a linked account an ID refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Discord,
    Epic,
}

/// Gaming platform reported by Yunite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Pc,
    Ps4,
    Xb1,
    Switch,
    Mobile,
    #[serde(other)]
    Unknown,
}

/// Input device reported by Yunite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChosenPeripheral {
    KeyboardMouse,
    Controller,
    Touch,
    #[serde(other)]
    Unknown,
}

// ============================================================================
// User links
// ============================================================================

/// Body for the user links lookup; several IDs may be resolved at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLinksRequest {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub user_ids: Vec<String>,
}

impl UserLinksRequest {
    pub fn new(user_type: UserType, user_ids: Vec<String>) -> Self {
        Self {
            user_type,
            user_ids,
        }
    }

    /// Rejects a lookup without any user IDs
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_ids.is_empty() {
            return Err(DomainError::ValidationFailed(
                "userIds must contain at least one ID".to_string(),
            ));
        }
        if self.user_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DomainError::ValidationFailed(
                "userIds must not contain blank IDs".to_string(),
            ));
        }
        Ok(())
    }
}

/// Discord side of a linked user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Epic Games side of a linked user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicProfile {
    #[serde(rename = "epicID")]
    pub epic_id: Option<String>,
    #[serde(rename = "epicName")]
    pub epic_name: Option<String>,
}

/// A Discord user linked to an Epic account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedUser {
    #[serde(default)]
    pub discord: DiscordProfile,
    #[serde(default)]
    pub epic: EpicProfile,
    pub date_verified: Option<String>,
    pub chosen_platform: Option<Platform>,
    pub chosen_peripheral: Option<ChosenPeripheral>,
}

/// Result of a user links lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLinksResponse {
    #[serde(default)]
    pub users: Vec<LinkedUser>,
    /// Requested IDs that exist but are not linked
    #[serde(default)]
    pub not_linked: Vec<String>,
    /// Requested IDs Yunite does not know about
    #[serde(default)]
    pub not_found: Vec<String>,
}

// ============================================================================
// Blocks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockOp {
    Block,
    Unblock,
}

/// Body for blocking or unblocking a user in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserRequest {
    pub op: BlockOp,
    pub user_type: UserType,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub block_linked_user: bool,
}

impl BlockUserRequest {
    /// Rejects a request without a target user
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "userId cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockStatus {
    Success,
    AlreadyBlocked,
    NotFound,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUserResponse {
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
}
