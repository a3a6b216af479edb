//! HMAC-SHA256 webhook signature verification.
//!
//! The provider signs every delivery with the shared webhook secret and sends
//! `X-Hub-Signature-256: sha256=<lowercase hex>`. Verification recomputes the
//! full header value and compares it in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use hookrelay_core::service::crypto::SignatureVerifier;
use hookrelay_types::credential::Redacted;
use hookrelay_types::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

const PREFIX: &str = "sha256=";

/// [`SignatureVerifier`] for `sha256=`-prefixed HMAC-SHA256 headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha256Verifier;

impl HmacSha256Verifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for HmacSha256Verifier {
    fn verify(&self, raw_body: &[u8], presented_signature: &str, secret: &Redacted) -> bool {
        verify_signature(raw_body, presented_signature, secret.expose().as_bytes())
    }
}

/// Compute the header value the provider would send for `body`.
pub fn signature_header(body: &[u8], secret: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    Ok(format!("{PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
}

/// Constant-time comparison of the full `sha256=<hex>` strings.
///
/// A length mismatch or an unusable key is `false`. Hex case matters: the
/// provider always sends lowercase.
pub fn verify_signature(body: &[u8], presented: &str, secret: &[u8]) -> bool {
    match signature_header(body, secret) {
        Ok(expected) => expected.as_bytes().ct_eq(presented.as_bytes()).into(),
        Err(e) => {
            tracing::warn!(error = %e, "can't compute webhook signature");
            false
        }
    }
}
