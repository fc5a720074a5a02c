use thiserror::Error;

use super::types::FailureBody;
use crate::context::ContextError;
use crate::fallback::SearchError;

/// A search that could not be answered, not even with fallback data.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{error}")]
pub struct SearchFailure {
    pub error: SearchError,
    pub body: FailureBody,
}

impl SearchFailure {
    pub fn new(error: SearchError) -> Self {
        let body = FailureBody {
            error: error.kind.user_message().to_string(),
            suggestions: error.kind.suggestions(),
            can_retry: error.retryable,
        };
        Self { error, body }
    }
}

/// Errors returned by [`super::SearchPipeline::search`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid search request: {0}")]
    InvalidRequest(#[from] ContextError),

    #[error("search failed: {0}")]
    Failed(#[from] SearchFailure),
}
