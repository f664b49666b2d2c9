//! Rate-limit signals carried by Yunite responses
//!
//! Yunite reports its per-bucket quota in three headers:
//!
//! - `x-ratelimit-bucket`: bucket identifier. Its presence is what marks a
//!   response as rate-limited at all; without it the other two are ignored.
//! - `x-ratelimit-reset-after`: seconds (fractional) until the bucket resets.
//! - `x-ratelimit-remaining`: calls left in the current window.
//!
//! A 429 that lacks the reset header may still carry a standard
//! `Retry-After`, which is honoured as a fallback.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::warn;

/// Bucket identifier header
pub const BUCKET_HEADER: &str = "x-ratelimit-bucket";

/// Seconds until the bucket's window resets
pub const RESET_AFTER_HEADER: &str = "x-ratelimit-reset-after";

/// Calls remaining in the current window
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Longest wait accepted from a single header value
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Rate-limit contract attached to a single response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Server-side bucket the route belongs to
    pub bucket: String,
    /// Time until the window resets; `None` if the header is missing or garbled
    pub reset_after: Option<Duration>,
    /// Permits left in the window; `None` if the header is missing or garbled
    pub remaining: Option<i64>,
}

impl RateLimitHeaders {
    /// Extracts the rate-limit contract, or `None` when the response has no
    /// bucket header and therefore no contract.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let bucket = header_str(headers, BUCKET_HEADER)?.to_string();

        let reset_after = header_str(headers, RESET_AFTER_HEADER).and_then(|v| {
            let parsed = parse_reset_after(v);
            if parsed.is_none() {
                warn!(value = v, "Could not parse {} header", RESET_AFTER_HEADER);
            }
            parsed
        });

        let remaining = header_str(headers, REMAINING_HEADER).and_then(|v| {
            let parsed = v.trim().parse::<i64>().ok();
            if parsed.is_none() {
                warn!(value = v, "Could not parse {} header", REMAINING_HEADER);
            }
            parsed
        });

        Some(Self {
            bucket,
            reset_after,
            remaining,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Parses a reset-window value in seconds into a millisecond-precision Duration.
///
/// Fractions of a millisecond round up so that a wait never ends before the
/// server's window does. Windows longer than [`MAX_RETRY_AFTER`] are
/// clamped to it. Negative, NaN and infinite values yield `None`.
pub fn parse_reset_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let millis = (seconds * 1000.0).ceil();
    if millis >= MAX_RETRY_AFTER.as_millis() as f64 {
        return Some(MAX_RETRY_AFTER);
    }
    Some(Duration::from_millis(millis as u64))
}

/// Parses a Retry-After header value into a Duration.
///
/// The header can be either:
/// - An integer number of seconds (e.g., "30")
/// - An HTTP-date (e.g., "Fri, 31 Dec 2025 23:59:59 GMT") - parsed as seconds from now
///
/// Falls back to the default duration if parsing fails or the value is
/// longer than [`MAX_RETRY_AFTER`].
pub fn parse_retry_after(value: &str, default: Duration) -> Duration {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        let duration = Duration::from_secs(seconds);
        if duration <= MAX_RETRY_AFTER {
            return duration;
        }
        warn!(value, "Retry-After exceeds the maximum wait, using default");
        return default;
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value.trim()) {
        let now = chrono::Utc::now();
        let target = date.with_timezone(&chrono::Utc);
        if target > now {
            let diff = target - now;
            if let Some(secs) = diff
                .num_seconds()
                .try_into()
                .ok()
                .filter(|&s: &u64| s <= MAX_RETRY_AFTER.as_secs())
            {
                return Duration::from_secs(secs);
            }
        } else {
            return Duration::ZERO;
        }
    }

    warn!(value, "Could not parse Retry-After header, using default");
    default
}

/// How long to back off after a 429.
///
/// Prefers the reset-window header, then `Retry-After`, then `default`.
pub fn retry_delay(headers: &HeaderMap, default: Duration) -> Duration {
    if let Some(delay) = header_str(headers, RESET_AFTER_HEADER).and_then(parse_reset_after) {
        return delay;
    }

    match header_str(headers, RETRY_AFTER.as_str()) {
        Some(value) => parse_retry_after(value, default),
        None => default,
    }
}
