//! Credential decryption and payload signature ports.
//!
//! Defined in hookrelay-core so the pipeline can authenticate deliveries
//! without coupling to a specific cipher or MAC. The PBKDF2/AES-CBC and
//! HMAC-SHA256 adapters live in hookrelay-infra.

use hookrelay_types::credential::{DecryptionKey, EncryptedSecret, Redacted};
use hookrelay_types::error::DecryptionError;

/// Recovers a plaintext credential from its encrypted-at-rest form.
pub trait CredentialDecryptor: Send + Sync {
    /// Decrypt `blob` with the caller-supplied passphrase.
    ///
    /// Pure function of its inputs: no key material is cached between calls.
    fn decrypt(
        &self,
        blob: &EncryptedSecret,
        passphrase: &DecryptionKey,
    ) -> Result<Redacted, DecryptionError>;
}

/// Checks that a payload was signed with the shared webhook secret.
pub trait SignatureVerifier: Send + Sync {
    /// Returns `false` on any mismatch. Never errors.
    fn verify(&self, raw_body: &[u8], presented_signature: &str, secret: &Redacted) -> bool;
}
