//! Raw responses returned by the dispatcher

use std::borrow::Cow;

use reqwest::{header::HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::{rate_limit::RateLimitHeaders, ApiError, Result};

/// A fully read HTTP response: status, headers and body bytes.
///
/// Error responses are kept in the same shape, so a caller holding an
/// [`ApiError::Remote`] sees exactly what the server sent.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Rate-limit contract carried by this response, if any
    pub fn rate_limit(&self) -> Option<RateLimitHeaders> {
        RateLimitHeaders::from_headers(&self.headers)
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    /// [`ApiError::InvalidResponse`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "failed to decode {} body: {e}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Decodes the body as an untyped JSON value. An empty body is `null`.
    pub fn value(&self) -> Result<serde_json::Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }
}
