//! Domain error types
//!
//! Errors raised while validating identifiers and request arguments,
//! before anything is sent over the network.

use thiserror::Error;

/// Errors that can occur while building domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid Discord guild identifier
    #[error("Invalid guild ID: {0}")]
    InvalidGuildId(String),

    /// Invalid tournament identifier
    #[error("Invalid tournament ID: {0}")]
    InvalidTournamentId(String),

    /// Invalid match session identifier
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    /// The API token is empty or contains characters not allowed in a header
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// Generic validation failure for request arguments
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
