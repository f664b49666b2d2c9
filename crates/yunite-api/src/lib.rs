//! Yunite API - rate-limit aware client for the Yunite REST API
//!
//! Provides an async client for:
//! - Application data and guild deauthorization
//! - Registration links and user blocks
//! - Tournaments, leaderboards, matches and teams
//! - Support-system statistics and websocket tokens
//!
//! Every request is throttled per endpoint according to the rate-limit
//! headers the server returns, and 429 responses are retried after the
//! reported reset window.
//!
//! ## Modules
//!
//! - [`client`] - Typed methods for each API route
//! - [`dispatcher`] - Authenticated request sending and 429 recovery
//! - [`gate`] - Per-endpoint FIFO admission and permit tracking
//! - [`endpoint`] - Endpoint key normalization
//! - [`rate_limit`] - Rate-limit header parsing

pub mod client;
pub mod dispatcher;
pub mod endpoint;
pub mod gate;
pub mod rate_limit;
pub mod response;

use reqwest::{header::HeaderMap, StatusCode};
use thiserror::Error;
use yunite_core::{config::ConfigError, domain::DomainError};

pub use client::YuniteClient;
pub use dispatcher::{Dispatcher, RequestOptions};
pub use endpoint::EndpointKey;
pub use gate::{GateSnapshot, RateGate};
pub use response::ApiResponse;

/// Errors returned by the Yunite client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client cannot be built from the given configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// An argument was rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// The server answered with a non-2xx status
    #[error("Yunite returned {}: {}", .0.status(), .0.text())]
    Remote(Box<ApiResponse>),

    /// No response was obtained (connection failure, timeout)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be constructed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of a remote error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote(response) => Some(response.status()),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The server's response, for remote errors
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Remote(response) => Some(&**response),
            _ => None,
        }
    }

    /// Headers of a remote error response
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.response().map(ApiResponse::headers)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Result type for Yunite API operations
pub type Result<T> = std::result::Result<T, ApiError>;
