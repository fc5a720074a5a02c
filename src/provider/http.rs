//! HTTP client for a JSON knowledge-search endpoint.
//!
//! Request: `POST {url}` with `{"query": ..., "location": {...}}`.
//! Response: either a bare JSON array of records or `{"restaurants": [...]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{LocationHint, ProviderError, SearchProvider};
use crate::parser::RawCandidateRecord;

const BODY_SNIPPET_LEN: usize = 200;

#[derive(Serialize)]
struct ProviderRequest<'a> {
    query: &'a str,
    location: &'a LocationHint,
}

/// Calls a remote provider over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    url: String,
    http: HttpClient,
}

impl HttpSearchProvider {
    /// Creates a client with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::new(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Drops the URL so its digits never reach message classification.
    fn transport_error(e: reqwest::Error) -> ProviderError {
        let e = e.without_url();
        if e.is_timeout() {
            ProviderError::new(format!("provider request timed out: {}", e))
        } else if e.is_connect() {
            ProviderError::new(format!("network error: connection failed: {}", e))
        } else if e.is_decode() {
            ProviderError::new(format!("unexpected provider response body: {}", e))
        } else {
            ProviderError::new(format!("network error: {}", e))
        }
    }

    fn records_from_body(body: serde_json::Value) -> Result<Vec<RawCandidateRecord>, ProviderError> {
        let items = match body {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("restaurants") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(ProviderError::new(
                        "unexpected provider response shape: missing `restaurants` array",
                    ));
                }
            },
            _ => {
                return Err(ProviderError::new(
                    "unexpected provider response shape: expected array or object",
                ));
            }
        };

        Ok(items.into_iter().map(RawCandidateRecord::new).collect())
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    #[instrument(skip(self, location), fields(url = %self.url))]
    async fn search(
        &self,
        query: &str,
        location: &LocationHint,
    ) -> Result<Vec<RawCandidateRecord>, ProviderError> {
        let response = self
            .http
            .post(&self.url)
            .json(&ProviderRequest { query, location })
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            warn!(status = status.as_u16(), "Provider returned an error status");
            let reason = status.canonical_reason().unwrap_or("error");
            return Err(ProviderError::with_status(
                status.as_u16(),
                format!("provider returned {} {}: {}", status.as_u16(), reason, snippet),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(Self::transport_error)?;
        let records = Self::records_from_body(body)?;
        debug!(records = records.len(), "Provider call succeeded");
        Ok(records)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_from_bare_array() {
        let body = serde_json::json!([{"name": "A"}, {"name": "B"}]);
        let records = HttpSearchProvider::records_from_body(body).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_from_wrapped_object() {
        let body = serde_json::json!({"restaurants": [{"name": "A"}]});
        let records = HttpSearchProvider::records_from_body(body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_records_from_unexpected_shape() {
        let err = HttpSearchProvider::records_from_body(serde_json::json!({"results": []}))
            .unwrap_err();
        assert!(err.message.contains("unexpected provider response shape"));

        let err = HttpSearchProvider::records_from_body(serde_json::json!("nope")).unwrap_err();
        assert!(err.status.is_none());
    }
}
