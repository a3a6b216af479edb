//! Business logic and port trait definitions for hookrelay.
//!
//! This crate defines the "ports" (credential decryption, signature
//! verification, provider API) that the infrastructure layer implements,
//! plus the pure webhook pipeline built on top of them. It depends only on
//! `hookrelay-types` -- never on `hookrelay-infra` or any network/crypto crate.

pub mod gateway;
pub mod service;
pub mod webhook;
pub mod workflow;

#[cfg(test)]
mod testing;
