//! Credential preparation commands: seal, sign.
//!
//! # Examples
//!
//! ```bash
//! # Encrypt the API token for GH_TOKEN (prompts for the passphrase)
//! printf '%s' "$TOKEN" | hookrelay seal
//!
//! # Compute the signature header for a saved payload
//! hookrelay sign payload.json --secret "$WEBHOOK_SECRET"
//! ```

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::Password;

use hookrelay_infra::crypto::credential::seal;
use hookrelay_infra::crypto::signature::signature_header;

/// Encrypt stdin into the salted wire format and print the blob.
pub fn seal_secret(passphrase: Option<String>) -> Result<()> {
    let passphrase = match passphrase {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Passphrase")
            .with_confirmation("Repeat passphrase", "Passphrases don't match")
            .interact()?,
    };

    let mut plaintext = String::new();
    std::io::stdin()
        .read_to_string(&mut plaintext)
        .context("can't read secret from stdin")?;

    let blob = seal_text(&plaintext, &passphrase)?;
    eprintln!(
        "  {} Sealed {} bytes",
        style("✓").green().bold(),
        plaintext.trim().len()
    );
    println!("{blob}");
    Ok(())
}

/// Print the signature header value for the body stored at `body`.
pub async fn sign_body(body: &Path, secret: Option<String>) -> Result<()> {
    let secret = match secret {
        Some(s) => s,
        None => Password::new().with_prompt("Webhook secret").interact()?,
    };
    let bytes = tokio::fs::read(body)
        .await
        .with_context(|| format!("can't read {}", body.display()))?;

    println!("{}", sign_bytes(&bytes, &secret)?);
    Ok(())
}

/// Signature header for `bytes`. A blank secret is refused.
fn sign_bytes(bytes: &[u8], secret: &str) -> Result<String> {
    if secret.trim().is_empty() {
        bail!("webhook secret is empty");
    }
    signature_header(bytes, secret.as_bytes()).context("can't sign body")
}

/// Seal the trimmed `plaintext`. Empty input is refused.
fn seal_text(plaintext: &str, passphrase: &str) -> Result<String> {
    let trimmed = plaintext.trim();
    if trimmed.is_empty() {
        bail!("nothing to seal: input is empty");
    }
    let blob = seal(trimmed, passphrase).context("can't seal secret")?;
    Ok(blob.as_str().to_string())
}
