//! Classified failures for storefront API calls.
//!
//! Every failure leaving the client is one of five categories. Transport
//! errors from `reqwest` are folded into these and never surface raw.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of error body characters kept in a message.
const MAX_BODY_CHARS: usize = 200;

/// Errors that can occur when calling the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing or rejected credentials (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Server-side consistency conflict (HTTP 409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// 5xx response or network failure; likely to succeed on retry.
    #[error("transient server error{}: {message}", format_status(.status))]
    TransientServerError {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Error details.
        message: String,
    },

    /// Anything else: other statuses, malformed bodies, invalid requests.
    #[error("unknown error{}: {message}", format_status(.status))]
    Unknown {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Error details.
        message: String,
    },
}

impl ApiError {
    /// Classify a non-success HTTP response.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = summarize_body(body, status);
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            s if s.is_server_error() => Self::TransientServerError {
                status: Some(s.as_u16()),
                message,
            },
            s => Self::Unknown {
                status: Some(s.as_u16()),
                message,
            },
        }
    }

    /// Classify a transport-level failure.
    ///
    /// Builder errors are caller mistakes and never retried. Everything
    /// else (connect, timeout, broken body) is treated as transient.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::Unknown {
                status: None,
                message: format!("invalid request: {err}"),
            };
        }
        Self::TransientServerError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// A response body that could not be decoded.
    #[must_use]
    pub fn invalid_body(status: StatusCode, err: &serde_json::Error) -> Self {
        Self::Unknown {
            status: Some(status.as_u16()),
            message: format!("invalid response body: {err}"),
        }
    }

    /// Whether the retry loop may try again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransientServerError { .. })
    }

    /// HTTP status associated with this error, if known.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::TransientServerError { status, .. } | Self::Unknown { status, .. } => *status,
        }
    }
}

fn format_status(status: &Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
}

/// First characters of an error body, or the status reason when empty.
fn summarize_body(body: &str, status: StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }
    trimmed.chars().take(MAX_BODY_CHARS).collect()
}
