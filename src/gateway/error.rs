use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::{DINESCOUT_STATUS_HEADER, SearchStatus};
use crate::pipeline::{PipelineError, SearchFailure};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(SearchFailure),
}

impl From<PipelineError> for GatewayError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidRequest(e) => GatewayError::InvalidRequest(e.to_string()),
            PipelineError::Failed(failure) => GatewayError::SearchUnavailable(failure),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            DINESCOUT_STATUS_HEADER,
            HeaderValue::from_static(SearchStatus::Error.as_header_value()),
        );

        match self {
            GatewayError::InvalidRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                let body = Json(ErrorResponse {
                    error: format!("invalid request: {}", message),
                    code: status.as_u16(),
                });
                (status, headers, body).into_response()
            }
            GatewayError::SearchUnavailable(failure) => {
                (StatusCode::SERVICE_UNAVAILABLE, headers, Json(failure.body)).into_response()
            }
        }
    }
}
