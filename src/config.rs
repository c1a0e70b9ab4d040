//! Client configuration resolved from build-time environment variables.
//!
//! The WASM bundle has no process environment at runtime, so the browser build
//! bakes values in with `option_env!`. Parsing goes through a lookup closure
//! so tests can feed arbitrary maps.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_RETRIES: u32 = 2;

pub const API_URL_VAR: &str = "MOODLOG_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "MOODLOG_REQUEST_TIMEOUT_SECS";
pub const REQUEST_RETRIES_VAR: &str = "MOODLOG_REQUEST_RETRIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_base_url: String,
    /// Default per-request timeout.
    pub request_timeout: Duration,
    /// Default retry count for idempotent requests.
    pub request_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            request_retries: DEFAULT_REQUEST_RETRIES,
        }
    }
}

impl ClientConfig {
    /// Build config from variables captured at compile time.
    ///
    /// Optional:
    /// - `MOODLOG_API_URL`: default `/api`
    /// - `MOODLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MOODLOG_REQUEST_RETRIES`: default 2
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                API_URL_VAR => option_env!("MOODLOG_API_URL"),
                REQUEST_TIMEOUT_VAR => option_env!("MOODLOG_REQUEST_TIMEOUT_SECS"),
                REQUEST_RETRIES_VAR => option_env!("MOODLOG_REQUEST_RETRIES"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = normalize_base_url(
            lookup(API_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        );
        let timeout_secs = parse_or(lookup(REQUEST_TIMEOUT_VAR), DEFAULT_REQUEST_TIMEOUT_SECS);
        let request_retries = parse_or(lookup(REQUEST_RETRIES_VAR), DEFAULT_REQUEST_RETRIES);

        Self { api_base_url, request_timeout: Duration::from_secs(timeout_secs), request_retries }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
