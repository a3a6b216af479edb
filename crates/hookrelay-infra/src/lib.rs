//! Infrastructure layer for hookrelay.
//!
//! Contains implementations of the port traits defined in `hookrelay-core`:
//! PBKDF2/AES-256-CBC credential decryption, HMAC-SHA256 signature
//! verification, the GitHub REST client, and environment-backed credential
//! loading. Also owns the TOML configuration loader.

pub mod config;
pub mod crypto;
pub mod github;
pub mod secret;
