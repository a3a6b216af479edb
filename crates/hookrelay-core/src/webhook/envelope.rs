//! Building and unwrapping [`WebhookEnvelope`]s.
//!
//! Two transports feed the pipeline: the HTTP server (which fills the
//! envelope from axum extractors) and the serverless entry point, whose
//! invocation document looks like:
//!
//! ```json
//! { "http": { "headers": {..}, "queryString": "key=..", "body": "..", "isBase64Encoded": false } }
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use hookrelay_types::envelope::WebhookEnvelope;
use hookrelay_types::error::GatewayError;

/// Returns the payload bytes, undoing transport base64 when flagged.
pub fn decode_body(envelope: &WebhookEnvelope) -> Result<Vec<u8>, GatewayError> {
    if !envelope.is_base64_encoded {
        return Ok(envelope.body.clone());
    }
    // Some transports wrap long base64 bodies; whitespace is not part of the payload.
    let compact: Vec<u8> = envelope
        .body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| GatewayError::MalformedRequest(format!("can't decode http.body: {e}")))
}

/// Parses a serverless invocation document into an envelope.
pub fn from_invocation(args: &Value) -> Result<WebhookEnvelope, GatewayError> {
    let http = args
        .get("http")
        .and_then(Value::as_object)
        .ok_or_else(|| missing("http"))?;

    let headers = http
        .get("headers")
        .and_then(Value::as_object)
        .ok_or_else(|| missing("http.headers"))?;

    let query_str = http
        .get("queryString")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("http.queryString"))?;

    let query: Vec<(String, String)> = serde_urlencoded::from_str(query_str).map_err(|e| {
        GatewayError::MalformedRequest(format!("can't decode http.queryString: {e}"))
    })?;

    let body = http
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("http.body"))?;

    let is_base64 = http
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut envelope = WebhookEnvelope::new(body.as_bytes().to_vec()).with_base64_body(is_base64);
    for (name, value) in headers {
        // Non-string header values carry nothing we read.
        if let Some(value) = value.as_str() {
            envelope.insert_header(name, value);
        }
    }
    for (name, value) in query {
        envelope = envelope.with_query(name, value);
    }
    Ok(envelope)
}

fn missing(field: &str) -> GatewayError {
    GatewayError::MalformedRequest(format!("missing {field}"))
}
