use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cache::{CacheStats, DINESCOUT_STATUS_HEADER};
use crate::context::SearchRequest;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::pipeline::SearchResponse;

#[instrument(skip(state, request), fields(query = tracing::field::Empty))]
pub async fn search_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: SearchRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;
    tracing::Span::current().record("query", request.query.as_str());

    let response = state.pipeline.search(&request).await?;
    debug!(
        status = %response.status,
        results = response.total_results,
        "Search answered"
    );
    Ok(make_response(response))
}

pub(crate) fn make_response(response: SearchResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        DINESCOUT_STATUS_HEADER,
        HeaderValue::from_static(response.status.as_header_value()),
    );
    (StatusCode::OK, headers, Json(response)).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub cache: CacheStats,
    pub hit_rate: f64,
    pub fallback_lane_entries: u64,
    pub error_buckets: usize,
    pub provider: String,
}

#[instrument(skip(state))]
pub async fn cache_stats_handler(State(state): State<HandlerState>) -> Response {
    let pipeline = &state.pipeline;
    let cache = pipeline.cache().stats();

    Json(CacheStatsResponse {
        hit_rate: cache.hit_rate(),
        cache,
        fallback_lane_entries: pipeline.lane().len(),
        error_buckets: pipeline.fallback().limiter().tracked_buckets(),
        provider: pipeline.provider_name().to_string(),
    })
    .into_response()
}
