//! Envelope response format for all responses.
//!
//! Every response, over HTTP or from `invoke`, is wrapped in the same
//! envelope:
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": []
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hookrelay_core::gateway::GatewayOutcome;
use hookrelay_types::error::GatewayError;

/// Envelope response wrapping all data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// The main response payload.
    pub data: Option<T>,

    /// Request metadata.
    pub meta: ApiMeta,

    /// Error list (empty on success).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,

    #[serde(skip)]
    pub status: u16,
}

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    /// Unique request identifier for tracing.
    pub request_id: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiMeta {
    fn now(request_id: String, response_time_ms: u64) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(status: u16, data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::now(request_id, response_time_ms),
            errors: Vec::new(),
            status,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Envelope for a finished pipeline run.
    pub fn from_outcome(
        outcome: &GatewayOutcome,
        request_id: String,
        response_time_ms: u64,
    ) -> Self {
        Self::success(
            outcome.status_code(),
            outcome.to_body(),
            request_id,
            response_time_ms,
        )
    }

    /// Envelope for a failed pipeline run.
    pub fn from_error(err: &GatewayError, request_id: String, response_time_ms: u64) -> Self {
        Self::error(
            err.status_code(),
            err.code(),
            &err.to_string(),
            request_id,
            response_time_ms,
        )
    }

    /// Create an error response (no data).
    pub fn error(
        status: u16,
        code: &str,
        message: &str,
        request_id: String,
        response_time_ms: u64,
    ) -> Self {
        Self {
            data: None,
            meta: ApiMeta::now(request_id, response_time_ms),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            }],
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
