//! Environment variable credential source.
//!
//! Reads the encrypted webhook secret and API token from the variables named
//! in `[credentials]` (`GH_SECRET` and `GH_TOKEN` by default). Variables are
//! read on every call so a rotated value is picked up by the next delivery.

use hookrelay_core::service::credentials::CredentialSource;
use hookrelay_types::config::CredentialEnvConfig;
use hookrelay_types::credential::{EncryptedSecret, StoredCredentials};

pub struct EnvCredentialSource {
    webhook_secret_var: String,
    api_token_var: String,
}

impl EnvCredentialSource {
    pub fn new(config: &CredentialEnvConfig) -> Self {
        Self {
            webhook_secret_var: config.webhook_secret_env.clone(),
            api_token_var: config.api_token_env.clone(),
        }
    }

    fn read(name: &str) -> EncryptedSecret {
        match std::env::var(name) {
            Ok(value) => EncryptedSecret::new(value),
            Err(std::env::VarError::NotPresent) => {
                tracing::debug!(var = name, "credential variable not set");
                EncryptedSecret::new("")
            }
            Err(std::env::VarError::NotUnicode(_)) => {
                // A credential must be base64 text; treat garbage as absent.
                tracing::warn!(var = name, "credential variable is not valid unicode");
                EncryptedSecret::new("")
            }
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new(&CredentialEnvConfig::default())
    }
}

impl CredentialSource for EnvCredentialSource {
    fn load(&self) -> StoredCredentials {
        StoredCredentials {
            webhook_secret: Self::read(&self.webhook_secret_var),
            api_token: Self::read(&self.api_token_var),
        }
    }
}
