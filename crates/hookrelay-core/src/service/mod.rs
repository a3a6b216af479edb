//! Port traits the gateway depends on.
//!
//! Adapters live in hookrelay-infra. Nothing here performs I/O.

pub mod credentials;
pub mod crypto;
pub mod provider;
