//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the identifiers that appear in Yunite routes.
//! Each newtype checks its value at construction time so that a malformed
//! argument is rejected before any request is built.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Returns true for characters that can appear unescaped in a path segment
fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

// ============================================================================
// Discord-side identifiers
// ============================================================================

/// Discord guild (server) ID
///
/// Format: a Discord snowflake, i.e. a non-empty string of ASCII digits
/// such as `"438337215584796692"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuildId(String);

impl GuildId {
    /// Create a new GuildId
    ///
    /// # Errors
    /// Returns error if the ID is empty or not made of digits
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidGuildId(
                "Guild ID cannot be empty".to_string(),
            ));
        }

        if !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidGuildId(format!(
                "Guild ID must be a numeric snowflake: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GuildId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuildId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GuildId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<GuildId> for String {
    fn from(id: GuildId) -> Self {
        id.0
    }
}

// ============================================================================
// Tournament identifiers
// ============================================================================

/// Yunite tournament ID
///
/// Format: non-empty, URL-safe (alphanumeric, `-`, `_`). Yunite hands these
/// out as UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TournamentId(String);

impl TournamentId {
    /// Create a new TournamentId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters that would
    /// alter the request path
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidTournamentId(
                "Tournament ID cannot be empty".to_string(),
            ));
        }

        if !id.chars().all(is_segment_char) {
            return Err(DomainError::InvalidTournamentId(format!(
                "Tournament ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TournamentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TournamentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TournamentId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TournamentId> for String {
    fn from(id: TournamentId) -> Self {
        id.0
    }
}

/// ID of a single match session inside a tournament
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchSessionId(String);

impl MatchSessionId {
    /// Create a new MatchSessionId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters that would
    /// alter the request path
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidSessionId(
                "Session ID cannot be empty".to_string(),
            ));
        }

        if !id.chars().all(is_segment_char) {
            return Err(DomainError::InvalidSessionId(format!(
                "Session ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MatchSessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchSessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MatchSessionId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MatchSessionId> for String {
    fn from(id: MatchSessionId) -> Self {
        id.0
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Yunite API token, sent verbatim in the `Y-Api-Token` header
///
/// The value never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Create a new ApiToken
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns error if the token is blank or contains characters that are
    /// not allowed in an HTTP header value
    pub fn new(token: impl Into<String>) -> Result<Self, DomainError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(DomainError::InvalidToken(
                "API token cannot be empty".to_string(),
            ));
        }

        if !token.chars().all(|c| c.is_ascii_graphic()) {
            return Err(DomainError::InvalidToken(
                "API token must be visible ASCII without spaces".to_string(),
            ));
        }

        Ok(Self(token))
    }

    /// Expose the secret for placing it in a request header
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl Display for ApiToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl FromStr for ApiToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
