//! Credential source implementations.
//!
//! - `env`: reads the stored blobs from environment variables

pub mod env;
