//! Normalized API error shape.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every failure that leaves the HTTP gateway is an `ApiError`: transport
//! failures, timeouts, non-2xx statuses and unreadable bodies alike. The
//! `kind` drives retry eligibility and the interceptor's forced logout; the
//! `message`/`notice` pair drives what the user sees.
//!
//! ERROR HANDLING
//! ==============
//! `message` is safe to show verbatim only when `user_friendly` is set.
//! Otherwise `notice()` substitutes a generic line for the error's kind.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::transport::TransportError;

pub const NETWORK_MESSAGE: &str = "Unable to connect to server. Please check your internet connection.";
pub const TRANSPORT_MESSAGE: &str = "Network error occurred. Please check your internet connection.";

/// Failure taxonomy. Each status maps to exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Validation,
    Authentication,
    Authorization,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => Self::Network,
            400 | 404 | 409 | 422 => Self::Validation,
            401 => Self::Authentication,
            403 => Self::Authorization,
            429 | 500 | 503 => Self::Server,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }

    /// Notice shown when the specific message is not user friendly.
    pub fn generic_notice(self) -> &'static str {
        match self {
            Self::Network => "Connection problem. Please check your internet connection.",
            Self::Server => "Server problem. Please try again later.",
            Self::Authentication => "Authentication problem. Please log in again.",
            Self::Authorization => "Permission problem. Please contact support.",
            Self::Validation => "Input problem. Please check your data.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified gateway failure.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status, `0` when no response arrived.
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    /// Full request URL.
    pub path: String,
    pub details: Option<serde_json::Value>,
    pub user_friendly: bool,
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        let details = parse_details(body);
        let (message, user_friendly) = match status_message(status) {
            Some(message) => (message.to_owned(), true),
            None => {
                let server_message = details
                    .as_ref()
                    .and_then(|d| d.get("message"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("Unknown error");
                (format!("Server error ({status}): {server_message}"), false)
            }
        };
        Self {
            kind: ErrorKind::from_status(status),
            message,
            status_code: status,
            timestamp: Utc::now(),
            path: path.to_owned(),
            details,
            user_friendly,
        }
    }

    /// Classify a failure that produced no HTTP status.
    pub fn from_transport(error: &TransportError, path: &str) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: TRANSPORT_MESSAGE.to_owned(),
            status_code: 0,
            timestamp: Utc::now(),
            path: path.to_owned(),
            details: Some(serde_json::json!({ "error": error.to_string() })),
            user_friendly: true,
        }
    }

    /// A 2xx response whose body does not match the expected shape.
    pub fn unreadable_body(status: u16, path: &str, error: &serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: format!("Unexpected response from server: {error}"),
            status_code: status,
            timestamp: Utc::now(),
            path: path.to_owned(),
            details: None,
            user_friendly: false,
        }
    }

    /// The request body could not be encoded; nothing was sent.
    pub fn unencodable_body(path: &str, error: &serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: format!("Request could not be encoded: {error}"),
            status_code: 0,
            timestamp: Utc::now(),
            path: path.to_owned(),
            details: None,
            user_friendly: false,
        }
    }

    /// One short line for a toast.
    pub fn notice(&self) -> &str {
        if self.user_friendly { &self.message } else { self.kind.generic_notice() }
    }

    /// Candidate for call-site backoff: network, or server without a status
    /// or with a 5xx status.
    pub fn should_retry(&self) -> bool {
        match self.kind {
            ErrorKind::Network => true,
            ErrorKind::Server => self.status_code == 0 || self.status_code >= 500,
            _ => false,
        }
    }

    /// 401 or 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication | ErrorKind::Authorization)
    }

    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Log with status, path and timestamp at a level matching the kind.
    pub fn log(&self) {
        match self.kind {
            ErrorKind::Network | ErrorKind::Server => log::error!(
                "api {} error: status={} path={} at={}: {}",
                self.kind,
                self.status_code,
                self.path,
                self.timestamp_iso(),
                self.message
            ),
            _ => log::warn!(
                "api {} error: status={} path={} at={}: {}",
                self.kind,
                self.status_code,
                self.path,
                self.timestamp_iso(),
                self.message
            ),
        }
    }
}

fn status_message(status: u16) -> Option<&'static str> {
    Some(match status {
        0 => NETWORK_MESSAGE,
        400 => "Invalid request. Please check your input and try again.",
        401 => "Authentication required. Please log in again.",
        403 => "Access denied. You don't have permission to perform this action.",
        404 => "Resource not found. The requested data does not exist.",
        409 => "Conflict. The resource already exists or has been modified.",
        422 => "Validation error. Please check your input data.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "Server error. Please try again later.",
        503 => "Service unavailable. Please try again later.",
        _ => return None,
    })
}

/// JSON bodies are kept as-is; anything else is wrapped as a string.
fn parse_details(body: &str) -> Option<serde_json::Value> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| serde_json::Value::String(trimmed.to_owned())))
}
