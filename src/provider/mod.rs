//! Knowledge-search provider seam.
//!
//! The provider is an opaque external system: the pipeline only sees
//! `search(query, location) -> records | error`. Nothing is assumed about its internal
//! retry or rate-limit behaviour beyond the error text and status it produces, which
//! [`crate::fallback::classify`] pattern-matches.

pub mod http;
pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::geo::Coordinates;
use crate::parser::RawCandidateRecord;

pub use http::HttpSearchProvider;
pub use mock::MockSearchProvider;

/// Where the provider should look.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationHint {
    /// Human-readable place name ("Tokyo, Japan").
    pub label: String,
    /// Search origin, when known.
    pub coordinates: Option<Coordinates>,
    pub radius_miles: f64,
}

/// A failed provider call: free text plus an optional HTTP-like status.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// The call exceeded its budget.
    pub fn timeout(budget: Duration) -> Self {
        Self::new(format!(
            "provider request timed out after {}ms",
            budget.as_millis()
        ))
    }
}

/// External knowledge-search provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns raw, untrusted candidate records for `query` around `location`.
    async fn search(
        &self,
        query: &str,
        location: &LocationHint,
    ) -> Result<Vec<RawCandidateRecord>, ProviderError>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "provider"
    }
}
