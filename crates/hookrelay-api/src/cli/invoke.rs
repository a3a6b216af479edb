//! Serverless-style single invocation.
//!
//! Reads the function-platform invocation JSON
//! (`{"http": {"headers", "queryString", "body", "isBase64Encoded"}}`),
//! runs the pipeline once and prints `{"statusCode", "body"}` to stdout.
//! Pipeline failures are reported through `statusCode`, not the exit code.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use uuid::Uuid;

use hookrelay_core::service::credentials::CredentialSource;
use hookrelay_core::webhook::envelope::from_invocation;
use hookrelay_types::error::GatewayError;

use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Read the invocation from `input` (or stdin) and print the result.
pub async fn invoke(state: &AppState, input: Option<&Path>) -> Result<()> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("can't read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("can't read invocation from stdin")?;
            buf
        }
    };

    let result = run_invocation(state, &raw).await;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

/// Run one invocation and build the `{statusCode, body}` reply.
pub async fn run_invocation(state: &AppState, raw: &str) -> Value {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let result = match serde_json::from_str::<Value>(raw) {
        Ok(args) => match from_invocation(&args) {
            Ok(envelope) => {
                let stored = state.credentials.load();
                state.gateway.handle(&envelope, &stored).await
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(GatewayError::MalformedRequest(format!(
            "can't parse invocation: {e}"
        ))),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    let envelope = match &result {
        Ok(outcome) => ApiResponse::from_outcome(outcome, request_id, elapsed),
        Err(e) => {
            tracing::info!(error = %e, "invocation rejected");
            ApiResponse::from_error(e, request_id, elapsed)
        }
    };

    json!({
        "statusCode": envelope.status,
        "body": envelope,
    })
}
