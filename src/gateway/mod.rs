//! HTTP gateway (Axum) for the search pipeline.
//!
//! This module is primarily used by the `dinescout` server binary.

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{cache_stats_handler, search_handler};
pub use state::HandlerState;

use crate::cache::{
    DINESCOUT_STATUS_HEADER, DINESCOUT_STATUS_HEALTHY, DINESCOUT_STATUS_NOT_READY,
    DINESCOUT_STATUS_READY,
};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/search", post(search_handler))
        .route("/v1/cache/stats", get(cache_stats_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub cache: &'static str,
    pub provider: String,
    pub fallback: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        DINESCOUT_STATUS_HEADER,
        HeaderValue::from_static(DINESCOUT_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let http_status = if state.is_accepting() {
        DINESCOUT_STATUS_READY
    } else {
        DINESCOUT_STATUS_NOT_READY
    };

    let pipeline = &state.pipeline;
    let components = ComponentStatus {
        http: http_status,
        cache: DINESCOUT_STATUS_READY,
        provider: pipeline.provider_name().to_string(),
        fallback: if pipeline.config().fallback_enabled {
            "enabled"
        } else {
            "disabled"
        },
    };

    let is_ready = components.http == DINESCOUT_STATUS_READY;
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "draining" };

    let mut headers = HeaderMap::new();
    headers.insert(
        DINESCOUT_STATUS_HEADER,
        HeaderValue::from_static(http_status),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
