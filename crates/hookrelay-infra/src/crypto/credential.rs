//! Passphrase-based credential decryption (PBKDF2-SHA256 + AES-256-CBC).
//!
//! Stored credentials use the OpenSSL `enc` salted format, so they can be
//! produced with
//!
//! ```text
//! openssl enc -aes-256-cbc -salt -pbkdf2 -iter 10000 -md sha256 -base64 -A -k <key>
//! ```
//!
//! Wire format (after base64): `"Salted__" (8) || salt (8) || ciphertext`.
//! Key and IV come from a single 48-byte PBKDF2 output: bytes 0..32 are the
//! AES key, bytes 32..48 the IV.
//!
//! SECURITY: Error types never contain plaintext, key material, or ciphertext.

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use hookrelay_core::service::crypto::CredentialDecryptor;
use hookrelay_types::credential::{DecryptionKey, EncryptedSecret, Redacted};
use hookrelay_types::error::DecryptionError;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

const MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const HEADER_LEN: usize = MAGIC.len() + SALT_LEN;
const BLOCK_LEN: usize = 16;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const PBKDF2_ROUNDS: u32 = 10_000;

/// [`CredentialDecryptor`] for OpenSSL-compatible salted blobs.
///
/// Stateless: key material is derived on every call and dropped with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2AesCbcDecryptor;

impl Pbkdf2AesCbcDecryptor {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialDecryptor for Pbkdf2AesCbcDecryptor {
    fn decrypt(
        &self,
        blob: &EncryptedSecret,
        passphrase: &DecryptionKey,
    ) -> Result<Redacted, DecryptionError> {
        decrypt_blob(blob.as_str(), passphrase.expose()).map(Redacted::new)
    }
}

/// Decrypt a base64 salted blob and return the trimmed UTF-8 plaintext.
pub fn decrypt_blob(blob: &str, passphrase: &str) -> Result<String, DecryptionError> {
    if blob.is_empty() || passphrase.is_empty() {
        return Err(DecryptionError::EmptyInput);
    }

    // `openssl enc -base64` wraps lines at 64 columns.
    let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let data = STANDARD
        .decode(compact)
        .map_err(|_| DecryptionError::MalformedCiphertext)?;

    if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
        return Err(DecryptionError::MalformedCiphertext);
    }
    let (salt, ciphertext) = data[MAGIC.len()..].split_at(SALT_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptionError::MalformedCiphertext);
    }

    let material = derive_key_iv(passphrase.as_bytes(), salt);
    let (key, iv) = material.split_at(KEY_LEN);

    let mut buf = ciphertext.to_vec();
    let decrypted = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| DecryptionError::CipherInitError)?
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| DecryptionError::PaddingError)?;

    let plaintext = strip_padding(decrypted)?;
    let text = std::str::from_utf8(plaintext).map_err(|_| DecryptionError::InvalidPlaintext)?;
    Ok(text.trim().to_string())
}

/// Encrypt `plaintext` into the salted wire format with a fresh random salt.
pub fn seal(plaintext: &str, passphrase: &str) -> Result<EncryptedSecret, DecryptionError> {
    if passphrase.is_empty() {
        return Err(DecryptionError::EmptyInput);
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let material = derive_key_iv(passphrase.as_bytes(), &salt);
    let (key, iv) = material.split_at(KEY_LEN);

    let ciphertext = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|_| DecryptionError::CipherInitError)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&ciphertext);
    Ok(EncryptedSecret::new(STANDARD.encode(out)))
}

fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> [u8; KEY_LEN + IV_LEN] {
    let mut material = [0u8; KEY_LEN + IV_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ROUNDS, &mut material);
    material
}

/// Removes the trailing padding counted by the last byte.
///
/// Only the length byte is checked; a zero pad byte removes nothing.
fn strip_padding(data: &[u8]) -> Result<&[u8], DecryptionError> {
    let pad = *data.last().ok_or(DecryptionError::PaddingError)? as usize;
    if pad > data.len() {
        return Err(DecryptionError::PaddingError);
    }
    Ok(&data[..data.len() - pad])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Produced by `openssl enc -aes-256-cbc -salt -pbkdf2 -iter 10000 -md sha256 -base64 -A`.
    const TOKEN_BLOB: &str = "U2FsdGVkX19bsl1wlL60TWXBr0FRy53W88KYGICbWbM=";
    const SECRET_BLOB: &str = "U2FsdGVkX18WUfI2JVkStzzj9lnbPlBNjYerjzU2OBbLCqB3FUkJ2u+YuwBHzlTS";
    const PASSPHRASE: &str = "correct-horse";

    #[test]
    fn test_decrypt_openssl_blob_trims_newline() {
        assert_eq!(decrypt_blob(TOKEN_BLOB, PASSPHRASE).unwrap(), "hunter2-token");
    }

    #[test]
    fn test_decrypt_openssl_two_block_blob() {
        assert_eq!(
            decrypt_blob(SECRET_BLOB, PASSPHRASE).unwrap(),
            "It is a webhook secret"
        );
    }

    #[test]
    fn test_decrypt_accepts_wrapped_base64() {
        let wrapped = format!("{}\n{}\n", &SECRET_BLOB[..40], &SECRET_BLOB[40..]);
        assert_eq!(
            decrypt_blob(&wrapped, PASSPHRASE).unwrap(),
            "It is a webhook secret"
        );
    }

    #[test]
    fn test_wrong_passphrase_is_padding_error() {
        assert_eq!(
            decrypt_blob(TOKEN_BLOB, "wrong-horse").unwrap_err(),
            DecryptionError::PaddingError
        );
        assert_eq!(
            decrypt_blob(SECRET_BLOB, "battery-staple").unwrap_err(),
            DecryptionError::PaddingError
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(
            decrypt_blob("", PASSPHRASE).unwrap_err(),
            DecryptionError::EmptyInput
        );
        assert_eq!(
            decrypt_blob(TOKEN_BLOB, "").unwrap_err(),
            DecryptionError::EmptyInput
        );
    }

    #[test]
    fn test_malformed_blobs() {
        let malformed = [
            // not base64
            "!!!not-base64!!!".to_string(),
            // shorter than the header
            STANDARD.encode(b"Salted__1234"),
            // wrong marker
            STANDARD.encode(b"Peppered12345678aaaaaaaaaaaaaaaa"),
            // header only, no ciphertext
            STANDARD.encode(b"Salted__12345678"),
            // ciphertext not a whole number of blocks
            STANDARD.encode(b"Salted__12345678short"),
        ];
        for blob in &malformed {
            assert_eq!(
                decrypt_blob(blob, PASSPHRASE).unwrap_err(),
                DecryptionError::MalformedCiphertext,
                "blob {blob}"
            );
        }
    }

    #[test]
    fn test_strip_padding_bounds() {
        assert_eq!(strip_padding(&[b'a', b'b', 2, 2]).unwrap(), b"ab");
        assert_eq!(strip_padding(&[b'a', 0]).unwrap(), &[b'a', 0]);
        assert_eq!(
            strip_padding(&[b'a', 3]).unwrap_err(),
            DecryptionError::PaddingError
        );
        assert_eq!(strip_padding(&[]).unwrap_err(), DecryptionError::PaddingError);
    }

    #[test]
    fn test_non_utf8_plaintext_rejected() {
        // Seal raw bytes by hand: 0xff is never valid UTF-8.
        let salt = [7u8; SALT_LEN];
        let material = derive_key_iv(PASSPHRASE.as_bytes(), &salt);
        let (key, iv) = material.split_at(KEY_LEN);
        let ciphertext = Aes256CbcEnc::new_from_slices(key, iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(&[0xff, 0xfe, 0xfd]);
        let mut raw = MAGIC.to_vec();
        raw.extend_from_slice(&salt);
        raw.extend_from_slice(&ciphertext);

        assert_eq!(
            decrypt_blob(&STANDARD.encode(raw), PASSPHRASE).unwrap_err(),
            DecryptionError::InvalidPlaintext
        );
    }

    #[test]
    fn test_seal_uses_fresh_salt() {
        let a = seal("same", PASSPHRASE).unwrap();
        let b = seal("same", PASSPHRASE).unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("U2FsdGVkX1"));
    }

    #[test]
    fn test_seal_rejects_empty_passphrase() {
        assert_eq!(seal("x", "").unwrap_err(), DecryptionError::EmptyInput);
    }

    #[test]
    fn test_decryptor_trait_returns_redacted() {
        let decryptor = Pbkdf2AesCbcDecryptor::new();
        let secret = decryptor
            .decrypt(
                &EncryptedSecret::new(TOKEN_BLOB),
                &DecryptionKey::new(PASSPHRASE),
            )
            .unwrap();
        assert_eq!(secret.expose(), "hunter2-token");
        assert!(!format!("{secret:?}").contains("hunter2"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn seal_then_decrypt_returns_trimmed_plaintext(
            plaintext in "[ -~]{0,64}",
            passphrase in "[a-zA-Z0-9]{1,24}",
        ) {
            let blob = seal(&plaintext, &passphrase).unwrap();
            let recovered = decrypt_blob(blob.as_str(), &passphrase).unwrap();
            prop_assert_eq!(recovered, plaintext.trim());
        }

        #[test]
        fn arbitrary_blobs_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
            let _ = decrypt_blob(&STANDARD.encode(&bytes), PASSPHRASE);
        }

        #[test]
        fn salted_garbage_never_panics(
            salt in proptest::array::uniform8(any::<u8>()),
            body in proptest::collection::vec(any::<u8>(), 0..80),
        ) {
            let mut raw = MAGIC.to_vec();
            raw.extend_from_slice(&salt);
            raw.extend_from_slice(&body);
            let result = decrypt_blob(&STANDARD.encode(&raw), PASSPHRASE);
            if body.is_empty() || body.len() % BLOCK_LEN != 0 {
                prop_assert_eq!(result, Err(DecryptionError::MalformedCiphertext));
            }
        }
    }
}
