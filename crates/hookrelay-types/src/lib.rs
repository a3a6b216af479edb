//! Shared domain types for hookrelay.
//!
//! This crate contains the types passed between the gateway layers:
//! credentials, the inbound webhook envelope, classified events, provider
//! workflows, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod credential;
pub mod envelope;
pub mod error;
pub mod event;
pub mod workflow;
