//! Classified failures and the retry / fallback decision.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classify::{ErrorKind, classify};
use crate::provider::ProviderError;

/// Where and when the failure happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    pub query: String,
    pub location: String,
    pub attempt: u32,
}

/// A classified provider failure.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{kind} error ({code}): {message}")]
pub struct SearchError {
    pub kind: ErrorKind,
    pub message: String,
    pub code: String,
    pub retryable: bool,
    pub fallback_available: bool,
    pub context: ErrorContext,
}

impl SearchError {
    /// Classifies `error` and attaches the request context.
    pub fn from_provider(
        error: &ProviderError,
        context: ErrorContext,
        fallback_available: bool,
    ) -> Self {
        Self::new(classify(error), error.message.clone(), context, fallback_available)
    }

    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        context: ErrorContext,
        fallback_available: bool,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code: kind.code().to_string(),
            retryable: kind.is_retryable(),
            fallback_available,
            context,
        }
    }
}

/// Degraded ways to still answer a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Serve a nearby, possibly expired, cached result set.
    StaleCache,
    /// Ask the provider once more with a shorter, filter-free query.
    SimplifiedQuery,
    /// Synthesize a schema-valid result set.
    Mock,
}

impl FallbackStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStrategy::StaleCache => "stale_cache",
            FallbackStrategy::SimplifiedQuery => "simplified_query",
            FallbackStrategy::Mock => "mock",
        }
    }
}

impl std::fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Call the provider again after the backoff delay.
    Retry,
    /// Try these strategies in order; later entries are used when earlier ones yield nothing.
    Fallback(Vec<FallbackStrategy>),
    /// No fallback applies; surface the error.
    Fail,
}

/// Inputs to [`decide`] besides the error itself.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    /// 1-based number of the attempt that just failed.
    pub attempt: u32,
    pub max_attempts: u32,
    /// The per-origin error-rate limiter has tripped.
    pub rate_limited: bool,
    pub fallback_enabled: bool,
    /// The simplified-query strategy already ran for this request.
    pub simplified_tried: bool,
}

/// Retry iff the kind is retryable, attempts remain and the limiter has not tripped;
/// otherwise pick the fallback chain for the kind.
pub fn decide(kind: ErrorKind, input: DecisionInput) -> Decision {
    if kind.is_retryable() && input.attempt < input.max_attempts && !input.rate_limited {
        return Decision::Retry;
    }

    if !input.fallback_enabled {
        return Decision::Fail;
    }

    let chain = match kind {
        ErrorKind::ApiLimit => vec![FallbackStrategy::StaleCache, FallbackStrategy::Mock],
        ErrorKind::Network if !input.simplified_tried => {
            vec![FallbackStrategy::SimplifiedQuery, FallbackStrategy::Mock]
        }
        _ => vec![FallbackStrategy::Mock],
    };
    Decision::Fallback(chain)
}
