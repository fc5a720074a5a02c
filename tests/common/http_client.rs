//! Thin reqwest client for the gateway routes.

use std::time::Duration;

use dinescout::DINESCOUT_STATUS_HEADER;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct Components {
    pub http: String,
    pub cache: String,
    pub provider: String,
    pub fallback: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyBody {
    pub status: String,
    pub components: Components,
}

impl ReadyBody {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Status code, `X-Dinescout-Status` value and JSON body of one search call.
#[derive(Debug)]
pub struct SearchReply {
    pub code: u16,
    pub status: String,
    pub body: serde_json::Value,
}

#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    http: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(0)
            .build()
            .unwrap();
        Self { base_url, http }
    }

    pub async fn health(&self) -> reqwest::Result<HealthBody> {
        self.http
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn ready(&self) -> reqwest::Result<ReadyBody> {
        self.http
            .get(format!("{}/ready", self.base_url))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn search(&self, body: &serde_json::Value) -> reqwest::Result<SearchReply> {
        let response = self
            .http
            .post(format!("{}/v1/search", self.base_url))
            .json(body)
            .send()
            .await?;

        let code = response.status().as_u16();
        let status = response
            .headers()
            .get(DINESCOUT_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.json().await?;
        Ok(SearchReply { code, status, body })
    }

    pub async fn cache_stats(&self) -> reqwest::Result<serde_json::Value> {
        self.http
            .get(format!("{}/v1/cache/stats", self.base_url))
            .send()
            .await?
            .json()
            .await
    }
}
