//! The webhook pipeline.
//!
//! One invocation runs these steps in order, stopping at the first failure:
//!
//! 1. read the event type and signature headers
//! 2. recover the provider credentials (decrypt with the `key` parameter)
//! 3. unwrap the body and verify its signature
//! 4. parse and classify the payload
//! 5. run the outbound action (dispatch or keepalive scan)
//!
//! Nothing is kept between invocations. Plaintext credentials live only on
//! the stack of [`Gateway::handle`].

use serde_json::Value;

use hookrelay_types::config::PipelineConfig;
use hookrelay_types::credential::{DecryptionKey, ProviderCredentials, Redacted, StoredCredentials};
use hookrelay_types::envelope::{EVENT_HEADER, KEY_PARAM, SIGNATURE_HEADER, WebhookEnvelope};
use hookrelay_types::error::{ConfigError, GatewayError};

use crate::gateway::outcome::GatewayOutcome;
use crate::service::crypto::{CredentialDecryptor, SignatureVerifier};
use crate::service::provider::{ApiConnector, ProviderApi};
use crate::webhook::classify::classify;
use crate::webhook::dispatch::{OutboundAction, plan_dispatch, select_action};
use crate::webhook::envelope::decode_body;
use crate::workflow::keepalive::KeepaliveScanner;

pub struct Gateway<D, V, C> {
    decryptor: D,
    verifier: V,
    connector: C,
    config: PipelineConfig,
}

impl<D, V, C> Gateway<D, V, C>
where
    D: CredentialDecryptor,
    V: SignatureVerifier,
    C: ApiConnector,
{
    /// Validates `config` and builds the pipeline.
    pub fn new(
        decryptor: D,
        verifier: V,
        connector: C,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            decryptor,
            verifier,
            connector,
            config,
        })
    }

    /// Run one delivery through the pipeline.
    #[tracing::instrument(
        skip_all,
        fields(event = tracing::field::Empty, action = tracing::field::Empty, repository = tracing::field::Empty)
    )]
    pub async fn handle(
        &self,
        envelope: &WebhookEnvelope,
        stored: &StoredCredentials,
    ) -> Result<GatewayOutcome, GatewayError> {
        let span = tracing::Span::current();

        let event = envelope
            .header(EVENT_HEADER)
            .ok_or_else(|| GatewayError::MalformedRequest(format!("missing header {EVENT_HEADER}")))?;
        span.record("event", event);

        let signature = envelope.header(SIGNATURE_HEADER);
        if self.config.require_signature && signature.is_none() {
            tracing::warn!("delivery without signature header");
            return Err(GatewayError::AuthFailure);
        }

        let credentials = self.credentials(envelope, stored)?;

        let body = decode_body(envelope)?;

        if self.config.require_signature {
            let presented = signature.unwrap_or_default();
            if !self
                .verifier
                .verify(&body, presented, &credentials.webhook_secret)
            {
                tracing::warn!("payload signature mismatch");
                return Err(GatewayError::AuthFailure);
            }
        }

        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::MalformedRequest(format!("can't parse http.body: {e}")))?;

        let classified = classify(event, &payload, &self.config)?;
        if let Some(action) = &classified.action {
            span.record("action", action.as_str());
        }
        span.record("repository", classified.repository.as_str());

        let Some(outbound) = select_action(&classified, &self.config.dispatch) else {
            let reason = match &classified.action {
                Some(action) => format!("unsupported event {event}/{action}"),
                None => format!("unsupported event {event}"),
            };
            tracing::info!(%reason, "ignoring delivery");
            return Ok(GatewayOutcome::Ignored {
                event: classified.event,
                action: classified.action,
                reason,
            });
        };

        let api = self
            .connector
            .connect(&credentials.api_token)
            .map_err(GatewayError::UpstreamFailure)?;

        match outbound {
            OutboundAction::KeepaliveScan => {
                let workflows = KeepaliveScanner::new(&api, &self.config.keepalive)
                    .scan_and_rearm(&classified.repository)
                    .await?;
                tracing::info!(count = workflows.len(), "keepalive scan finished");
                Ok(GatewayOutcome::Rearmed {
                    event: classified,
                    workflows,
                })
            }
            action => {
                let plan = plan_dispatch(&classified, &action).ok_or_else(|| {
                    GatewayError::MalformedRequest("event has no dispatch type".to_string())
                })?;
                let dispatch = api
                    .create_dispatch(&plan.repository, &plan.request)
                    .await
                    .map_err(|e| {
                        tracing::warn!(target_repo = %plan.repository, error = %e, "dispatch failed");
                        GatewayError::UpstreamFailure(e)
                    })?;
                tracing::info!(
                    target_repo = %plan.repository,
                    event_type = %plan.request.event_type,
                    status = dispatch.response_status,
                    "dispatched"
                );
                Ok(GatewayOutcome::Dispatched {
                    event: classified,
                    dispatch,
                })
            }
        }
    }

    fn credentials(
        &self,
        envelope: &WebhookEnvelope,
        stored: &StoredCredentials,
    ) -> Result<ProviderCredentials, GatewayError> {
        let credentials = if self.config.require_encryption {
            self.decrypt_credentials(envelope, stored)?
        } else {
            ProviderCredentials {
                webhook_secret: Redacted::new(stored.webhook_secret.as_str()),
                api_token: Redacted::new(stored.api_token.as_str()),
            }
        };

        // Both credentials must be non-blank.
        for (name, value) in [
            ("webhook secret", &credentials.webhook_secret),
            ("api token", &credentials.api_token),
        ] {
            if value.expose().trim().is_empty() {
                tracing::warn!(credential = name, "credential is empty");
                return Err(GatewayError::AuthFailure);
            }
        }
        Ok(credentials)
    }

    fn decrypt_credentials(
        &self,
        envelope: &WebhookEnvelope,
        stored: &StoredCredentials,
    ) -> Result<ProviderCredentials, GatewayError> {
        let key = envelope
            .query_param(KEY_PARAM)
            .filter(|k| !k.is_empty())
            .map(DecryptionKey::new)
            .ok_or_else(|| {
                GatewayError::MalformedRequest(format!("missing query parameter {KEY_PARAM}"))
            })?;

        let webhook_secret = self
            .decryptor
            .decrypt(&stored.webhook_secret, &key)
            .map_err(|e| {
                tracing::warn!(credential = "webhook secret", error = %e, "can't decrypt credential");
                GatewayError::AuthFailure
            })?;
        let api_token = self.decryptor.decrypt(&stored.api_token, &key).map_err(|e| {
            tracing::warn!(credential = "api token", error = %e, "can't decrypt credential");
            GatewayError::AuthFailure
        })?;

        Ok(ProviderCredentials {
            webhook_secret,
            api_token,
        })
    }
}
