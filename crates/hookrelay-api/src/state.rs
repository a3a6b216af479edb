//! Shared application state wiring the pipeline to its adapters.
//!
//! The core `Gateway` is generic over decryptor/verifier/connector traits,
//! but AppState pins them to the concrete infra implementations.

use std::sync::Arc;

use hookrelay_core::gateway::Gateway;
use hookrelay_infra::crypto::credential::Pbkdf2AesCbcDecryptor;
use hookrelay_infra::crypto::signature::HmacSha256Verifier;
use hookrelay_infra::github::GitHubConnector;
use hookrelay_infra::secret::env::EnvCredentialSource;
use hookrelay_types::config::GatewayConfig;

/// Concrete gateway type pinned to infra implementations.
pub type ConcreteGateway = Gateway<Pbkdf2AesCbcDecryptor, HmacSha256Verifier, GitHubConnector>;

/// Shared application state.
///
/// Used by both `invoke` and the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ConcreteGateway>,
    pub credentials: Arc<EnvCredentialSource>,
}

impl AppState {
    /// Wire the pipeline from a loaded configuration.
    pub fn init(config: &GatewayConfig) -> anyhow::Result<Self> {
        let connector = GitHubConnector::new(&config.github)?;
        let gateway = Gateway::new(
            Pbkdf2AesCbcDecryptor::new(),
            HmacSha256Verifier::new(),
            connector,
            config.pipeline.clone(),
        )?;

        tracing::debug!(
            api = %config.github.api_base_url,
            prefix = %config.pipeline.allowed_repo_prefix,
            "gateway initialized"
        );

        Ok(Self {
            gateway: Arc::new(gateway),
            credentials: Arc::new(EnvCredentialSource::new(&config.credentials)),
        })
    }
}
