//! Domain types for the Yunite API
//!
//! This module contains:
//! - Newtypes for validated identifiers and the API secret
//! - Application and guild authorization payloads
//! - Registration payloads (user links, blocks)
//! - Tournament and team payloads
//! - Domain-specific error types

pub mod app;
pub mod errors;
pub mod newtypes;
pub mod registration;
pub mod tournament;

// Re-export commonly used types
pub use app::{AppInfo, AppResponse, AuthorizedGuild, GuildPermission};
pub use errors::DomainError;
pub use newtypes::*;
pub use registration::{
    BlockOp, BlockStatus, BlockUserRequest, BlockUserResponse, ChosenPeripheral, DiscordProfile,
    EpicProfile, LinkedUser, Platform, UserLinksRequest, UserLinksResponse, UserType,
};
pub use tournament::{
    AddTeamRequest, MatchTemplate, PointSystem, PriorityLevel, Region, TeamPlayer, Tiebreaker,
    Tournament,
};
