//! Credential wrappers.
//!
//! Every type here redacts its value in `Debug` and `Display` so a stray
//! `tracing` field or `{:?}` can never leak a secret.

use serde::{Deserialize, Serialize};

use std::fmt;

/// A wrapper that redacts secret values in Debug and Display output.
///
/// Use this to wrap any `String` that might contain sensitive data.
/// The actual value is accessible via `.expose()`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redacted(String);

impl Redacted {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Redacted(\"***\")")
    }
}

impl fmt::Display for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// A credential as stored in process configuration.
///
/// Wire form is base64 text decoding to `"Salted__" || salt[8] || ciphertext`.
/// When a deployment runs with encryption disabled the same slot carries the
/// plaintext value and is used verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret(String);

impl EncryptedSecret {
    pub fn new(blob: impl Into<String>) -> Self {
        Self(blob.into())
    }

    /// The base64 wire text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedSecret({} bytes)", self.0.len())
    }
}

/// One-time passphrase supplied by the caller (the `key` query parameter).
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptionKey(Redacted);

impl DecryptionKey {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(Redacted::new(passphrase))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose().is_empty()
    }
}

impl fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecryptionKey(\"***\")")
    }
}

/// The two provider credentials as read from process configuration.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// Shared secret used to sign webhook deliveries (`GH_SECRET`).
    pub webhook_secret: EncryptedSecret,
    /// Bearer token for the provider REST API (`GH_TOKEN`).
    pub api_token: EncryptedSecret,
}

/// Plaintext provider credentials, alive for a single invocation.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub webhook_secret: Redacted,
    pub api_token: Redacted,
}
