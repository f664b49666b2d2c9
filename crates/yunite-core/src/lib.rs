//! Yunite Core - configuration and domain types
//!
//! This crate holds everything the HTTP layer needs that does not itself
//! talk to the network:
//! - **Configuration** - `ClientConfig`, loaded from YAML or built in code
//! - **Identifiers** - validated newtypes such as `GuildId` and `TournamentId`
//! - **API shapes** - request bodies and response payloads of the Yunite API
//!
//! The `yunite-api` crate builds on these types to issue rate-limited requests.

pub mod config;
pub mod domain;
