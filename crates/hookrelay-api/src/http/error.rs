//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use hookrelay_types::error::GatewayError;

use crate::http::response::ApiResponse;

/// A pipeline failure tied to the request that produced it.
#[derive(Debug)]
pub struct AppError {
    pub error: GatewayError,
    /// Same id the handler logged for this request.
    pub request_id: String,
    pub response_time_ms: u64,
}

impl AppError {
    pub fn new(error: GatewayError, request_id: String, response_time_ms: u64) -> Self {
        Self {
            error,
            request_id,
            response_time_ms,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::from_error(&self.error, self.request_id, self.response_time_ms)
            .into_response()
    }
}
