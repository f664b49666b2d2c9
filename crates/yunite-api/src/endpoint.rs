//! Endpoint identity
//!
//! Yunite meters each route separately, so every outgoing call is tagged
//! with an [`EndpointKey`]: the request path relative to the API base URL,
//! without query string or fragment. Instance IDs in the path (guild,
//! tournament, session) stay in the key, which means two guilds never share
//! throttling state.

use std::fmt::{self, Display, Formatter};

use url::{Position, Url};

/// Normalized identity of a logical endpoint, used to look up gate state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey(String);

impl EndpointKey {
    /// Builds a key from an already relative path such as `/guild/1/tournaments`.
    pub fn new(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        Self(format!("/{trimmed}"))
    }

    /// Builds a key from whatever a caller handed the dispatcher.
    ///
    /// `target` may be a path relative to `base_url`, a full URL below
    /// `base_url`, or an absolute URL on another host. In the last case the
    /// key is `host[:port]/path`, so foreign endpoints never collide with
    /// API routes.
    pub fn from_target(base_url: &str, target: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        if let Some(rest) = target.strip_prefix(base_url) {
            if rest.is_empty() || rest.starts_with(['/', '?', '#']) {
                return Self::new(rest);
            }
        }

        if is_absolute(target) {
            if let Ok(url) = Url::parse(target) {
                let host_and_path = &url[Position::BeforeHost..Position::AfterPath];
                return Self(host_and_path.trim_end_matches('/').to_string());
            }
        }

        Self::new(target)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EndpointKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `target` carries its own scheme and must not be joined to the base URL.
pub(crate) fn is_absolute(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}
