//! API client errors and network failure classification.

use std::fmt;

use thiserror::Error;

/// Betslip API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status; `message` is the body's `error` text when present.
    #[error("Backend error ({status}): {message}")]
    Status { status: u16, message: String },

    /// 2xx response with `success` unset.
    #[error("{0}")]
    Server(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether this failure looks like the backend could not be reached.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Http(e) if e.is_connect() || e.is_timeout() => FailureKind::Connectivity,
            Self::Http(e) => classify_message(&error_chain(e)),
            _ => FailureKind::Generic,
        }
    }
}

/// Transport failure category, selecting the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connectivity,
    Generic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity => write!(
                f,
                "Cannot reach the betslip server. Check your connection and the API URL."
            ),
            Self::Generic => write!(f, "Betslip generation failed. Please try again."),
        }
    }
}

const CONNECTIVITY_PATTERNS: &[&str] = &[
    "network",
    "connect",
    "connection refused",
    "dns",
    "timed out",
    "unreachable",
    "failed to fetch",
];

/// reqwest appends the request URL as ` for url (...)`.
const URL_MARKER: &str = " for url (";

/// Classify a transport error message. URL segments are ignored so a host
/// name never decides the category.
pub fn classify_message(message: &str) -> FailureKind {
    let lower = strip_urls(message).to_ascii_lowercase();
    if CONNECTIVITY_PATTERNS.iter().any(|p| lower.contains(p)) {
        FailureKind::Connectivity
    } else {
        FailureKind::Generic
    }
}

fn strip_urls(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find(URL_MARKER) {
        out.push_str(&rest[..start]);
        let after = &rest[start + URL_MARKER.len()..];
        rest = after.find(')').map_or("", |end| &after[end + 1..]);
    }
    out.push_str(rest);
    out
}

/// Display text of `e` followed by its sources.
fn error_chain(e: &reqwest::Error) -> String {
    let mut text = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
