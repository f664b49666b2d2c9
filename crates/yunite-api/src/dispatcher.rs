//! Request dispatcher
//!
//! Every call to the Yunite API goes through [`Dispatcher::send`]. The
//! dispatcher attaches the token and compression headers, resolves the
//! target against the base URL, and runs each attempt through the
//! [`RateGate`] under the target's [`EndpointKey`]. Rate-limit headers on
//! every response feed back into the gate.
//!
//! A 429 is the only status handled here: the dispatcher waits out the
//! reported window and sends the same request again, for as long as the
//! server keeps answering 429 unless a cap is configured. Any other
//! non-2xx status is returned to the caller untouched as
//! [`ApiError::Remote`], and transport failures are never retried.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING},
    Client, Method, Request, StatusCode,
};
use tracing::{debug, info, warn};
use yunite_core::{
    config::{ClientConfig, ConfigError},
    domain::{ApiToken, DomainError},
};

use crate::{
    endpoint::{is_absolute, EndpointKey},
    gate::{GateSnapshot, RateGate},
    rate_limit::{retry_delay, RateLimitHeaders},
    response::ApiResponse,
    ApiError, Result,
};

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "Y-Api-Token";

const TOKEN_HEADER_NAME: HeaderName = HeaderName::from_static("y-api-token");

/// Accept-Encoding sent with every call
const ACCEPT_ENCODING_VALUE: &str = "gzip,deflate,compress";

const USER_AGENT: &str = concat!("yunite-rs/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// RequestOptions
// ============================================================================

/// Per-call extras: query parameters, headers and a transport timeout.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    /// Overrides the client-wide timeout for this call
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Sets an extra header. The token and Accept-Encoding headers are
    /// always set by the dispatcher and replace any value given here.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Rate-limit aware HTTP dispatcher for one Yunite credential.
///
/// Owns its [`RateGate`], so independently configured dispatchers in one
/// process never share throttling state.
#[derive(Debug)]
pub struct Dispatcher {
    client: Client,
    base_url: String,
    token: HeaderValue,
    gate: RateGate,
    suppress_logs: bool,
    max_rate_limit_retries: Option<u32>,
    default_retry_after: Duration,
}

impl Dispatcher {
    /// Builds a dispatcher from `config`.
    ///
    /// # Errors
    /// [`ApiError::Configuration`] if the token is missing or malformed,
    /// [`ApiError::Transport`] if the HTTP client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let token = config.api_token()?;
        Self::with_token(config, &token)
    }

    /// Builds a dispatcher from `config` using an explicit token, ignoring
    /// `config.api_token`.
    pub fn with_token(config: &ClientConfig, token: &ApiToken) -> Result<Self> {
        let mut token = HeaderValue::from_str(token.expose()).map_err(|e| {
            ConfigError::InvalidToken(DomainError::InvalidToken(e.to_string()))
        })?;
        token.set_sensitive(true);

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base_url = config.resolved_base_url();
        debug!(base_url = %base_url, "Dispatcher initialized");

        Ok(Self {
            client,
            base_url,
            token,
            gate: RateGate::new(),
            suppress_logs: config.suppress_logs,
            max_rate_limit_retries: config.max_rate_limit_retries,
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
        })
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The rate gate shared by all calls of this dispatcher
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Gate state for the endpoint `target` maps to
    pub fn gate_snapshot(&self, target: &str) -> Option<GateSnapshot> {
        self.gate.snapshot(&self.endpoint_key(target))
    }

    /// The key under which `target` is throttled
    pub fn endpoint_key(&self, target: &str) -> EndpointKey {
        EndpointKey::from_target(&self.base_url, target)
    }

    /// Full URL for `target`; absolute URLs are used as-is.
    pub fn resolve(&self, target: &str) -> String {
        if is_absolute(target) {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }

    /// Sends a request and returns the successful response.
    ///
    /// `target` is a path relative to the base URL or an absolute URL.
    /// Requests sharing an endpoint key are admitted in call order.
    ///
    /// # Errors
    /// - [`ApiError::Remote`] for any non-2xx status other than 429, or for
    ///   429 once `max_rate_limit_retries` is exhausted
    /// - [`ApiError::Transport`] when no response was obtained
    /// - [`ApiError::InvalidRequest`] when the request cannot be built
    pub async fn send(
        &self,
        method: Method,
        target: &str,
        options: RequestOptions,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        let key = self.endpoint_key(target);
        let request = self.build_request(method, target, options, body)?;
        let mut rate_limited: u32 = 0;

        loop {
            let attempt = request.try_clone().ok_or_else(|| {
                ApiError::InvalidRequest("request body cannot be replayed".to_string())
            })?;

            let response = self
                .gate
                .enqueue(&key, || self.execute(&key, attempt))
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                rate_limited += 1;
                if let Some(max) = self.max_rate_limit_retries {
                    if rate_limited > max {
                        warn!(endpoint = %key, attempts = rate_limited, "429 retry limit exhausted");
                        return Err(ApiError::Remote(Box::new(response)));
                    }
                }

                let wait = retry_delay(response.headers(), self.default_retry_after);
                if !self.suppress_logs {
                    warn!(
                        endpoint = %key,
                        attempt = rate_limited,
                        retry_after_ms = wait.as_millis(),
                        "Rate limited by Yunite, retrying after the reset window"
                    );
                }

                // The window starts now, so admission is open again once the
                // sleep below is over.
                self.gate.update_rate_limit(&key, wait);
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                debug!(endpoint = %key, status = status.as_u16(), "Request failed");
                return Err(ApiError::Remote(Box::new(response)));
            }

            if rate_limited > 0 {
                info!(endpoint = %key, attempts = rate_limited + 1, "Request succeeded after retry");
            }
            return Ok(response);
        }
    }

    fn build_request(
        &self,
        method: Method,
        target: &str,
        options: RequestOptions,
        body: Option<&serde_json::Value>,
    ) -> Result<Request> {
        // insert, not append: caller-supplied copies of these are replaced
        let mut headers = options.headers;
        headers.insert(TOKEN_HEADER_NAME, self.token.clone());
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static(ACCEPT_ENCODING_VALUE),
        );

        let mut builder = self
            .client
            .request(method, self.resolve(target))
            .headers(headers);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    /// One network round trip. Runs inside the gate.
    async fn execute(&self, key: &EndpointKey, request: Request) -> Result<ApiResponse> {
        debug!(endpoint = %key, method = %request.method(), "Sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        self.observe_rate_limit(key, &headers);

        let body = response.bytes().await?;
        debug!(
            endpoint = %key,
            status = status.as_u16(),
            bytes = body.len(),
            "Response received"
        );
        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }

    /// Feeds a response's rate-limit headers into the gate. Responses
    /// without a bucket header leave the gate untouched.
    fn observe_rate_limit(&self, key: &EndpointKey, headers: &HeaderMap) {
        let Some(limits) = RateLimitHeaders::from_headers(headers) else {
            return;
        };

        debug!(
            endpoint = %key,
            bucket = %limits.bucket,
            remaining = ?limits.remaining,
            reset_after_ms = ?limits.reset_after.map(|d| d.as_millis()),
            "Rate limit headers received"
        );

        self.gate
            .update_rate_limit(key, limits.reset_after.unwrap_or(Duration::ZERO));
        if let Some(permits) = limits.remaining.filter(|&p| p > 0) {
            self.gate.update_concurrency(key, permits);
        }
    }
}
