//! Error taxonomy and classification of opaque provider failures.
//!
//! The provider is an external system, so classification pattern-matches the error's
//! status and text rather than its type. Status wins over text when both are present.

use serde::{Deserialize, Serialize};

use crate::provider::ProviderError;

/// Failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    ApiLimit,
    Validation,
    Timeout,
    Unknown,
}

impl ErrorKind {
    /// `network`, `timeout` and `unknown` are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Unknown)
    }

    /// Machine code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "SEARCH_NETWORK_ERROR",
            ErrorKind::ApiLimit => "SEARCH_API_LIMIT",
            ErrorKind::Validation => "SEARCH_VALIDATION_ERROR",
            ErrorKind::Timeout => "SEARCH_TIMEOUT",
            ErrorKind::Unknown => "SEARCH_UNKNOWN_ERROR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::ApiLimit => "api_limit",
            ErrorKind::Validation => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Human summary for users.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Network => "We couldn't reach the restaurant search service.",
            ErrorKind::ApiLimit => "The restaurant search service is busy right now.",
            ErrorKind::Validation => "The search request couldn't be processed.",
            ErrorKind::Timeout => "The restaurant search took too long to respond.",
            ErrorKind::Unknown => "Something went wrong while searching for restaurants.",
        }
    }

    /// Two or three things the user can do about it.
    pub fn suggestions(&self) -> Vec<String> {
        let items: &[&str] = match self {
            ErrorKind::Network => &[
                "Check your internet connection",
                "Try again in a few moments",
            ],
            ErrorKind::ApiLimit => &[
                "Wait a minute before searching again",
                "Try a more specific search to reuse recent results",
            ],
            ErrorKind::Validation => &[
                "Check the location and filters in your search",
                "Try simpler search terms",
            ],
            ErrorKind::Timeout => &[
                "Try again in a few moments",
                "Narrow your search with a cuisine or smaller radius",
            ],
            ErrorKind::Unknown => &[
                "Try again in a few moments",
                "Try a different search",
                "Search a nearby location",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const API_LIMIT_PATTERNS: &[&str] = &[
    "rate limit",
    "rate-limit",
    "ratelimit",
    "rate limited",
    "too many requests",
    "quota",
];
const TIMEOUT_PATTERNS: &[&str] = &["timeout", "timed out", "abort", "deadline"];
const NETWORK_PATTERNS: &[&str] = &[
    "network",
    "fetch",
    "connection",
    "connect",
    "dns",
    "refused",
    "reset",
    "unreachable",
    "socket",
];
const VALIDATION_PATTERNS: &[&str] = &[
    "invalid",
    "bad request",
    "malformed",
    "validation",
    "unexpected provider response",
];

fn kind_for_status(status: u16) -> Option<ErrorKind> {
    match status {
        429 => Some(ErrorKind::ApiLimit),
        408 | 504 => Some(ErrorKind::Timeout),
        502 | 503 => Some(ErrorKind::Network),
        400..=499 => Some(ErrorKind::Validation),
        _ => None,
    }
}

/// Classifies by free text alone.
pub fn classify_message(message: &str) -> ErrorKind {
    let message = message.to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|p| message.contains(p));

    if matches(API_LIMIT_PATTERNS) {
        ErrorKind::ApiLimit
    } else if matches(TIMEOUT_PATTERNS) {
        ErrorKind::Timeout
    } else if matches(NETWORK_PATTERNS) {
        ErrorKind::Network
    } else if matches(VALIDATION_PATTERNS) {
        ErrorKind::Validation
    } else {
        ErrorKind::Unknown
    }
}

/// Classifies a provider failure by status, then text.
pub fn classify(error: &ProviderError) -> ErrorKind {
    error
        .status
        .and_then(kind_for_status)
        .unwrap_or_else(|| classify_message(&error.message))
}
