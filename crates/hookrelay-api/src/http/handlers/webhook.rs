//! Webhook receiver handler.
//!
//! Converts the HTTP request into a [`WebhookEnvelope`] and runs it through
//! the gateway pipeline. The status code comes from the outcome (200/202) or
//! from the pipeline error (400/403/502).

use std::collections::HashMap;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde_json::Value;
use uuid::Uuid;

use hookrelay_core::service::credentials::CredentialSource;
use hookrelay_types::envelope::WebhookEnvelope;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Header that flags a base64-encoded request body.
const TRANSFER_ENCODING_HEADER: &str = "content-transfer-encoding";

/// POST /webhook - Receive a provider delivery.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ApiResponse<Value>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let envelope = envelope_from_request(&headers, query, &body);
    let stored = state.credentials.load();

    let result = state.gateway.handle(&envelope, &stored).await;
    let elapsed = start.elapsed().as_millis() as u64;
    let outcome = result.map_err(|e| {
        tracing::info!(request_id = %request_id, error = %e, "webhook rejected");
        AppError::new(e, request_id.clone(), elapsed)
    })?;

    tracing::info!(
        request_id = %request_id,
        status = outcome.status_code(),
        elapsed_ms = elapsed,
        "webhook handled"
    );
    Ok(ApiResponse::from_outcome(&outcome, request_id, elapsed))
}

/// Build the pipeline envelope from the raw request parts.
///
/// Header values that aren't valid UTF-8 are dropped.
fn envelope_from_request(
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: &[u8],
) -> WebhookEnvelope {
    let is_base64 = headers
        .get(TRANSFER_ENCODING_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"));

    let mut envelope = WebhookEnvelope::new(body.to_vec()).with_base64_body(is_base64);
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            envelope.insert_header(name.as_str(), value);
        }
    }
    query
        .into_iter()
        .fold(envelope, |envelope, (name, value)| envelope.with_query(name, value))
}
