//! Cryptographic operations for hookrelay.
//!
//! - `credential`: PBKDF2-SHA256 + AES-256-CBC decryption of stored credentials
//! - `signature`: HMAC-SHA256 webhook signature verification

pub mod credential;
pub mod signature;
