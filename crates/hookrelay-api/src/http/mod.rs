//! HTTP layer for hookrelay.
//!
//! Axum server with a single webhook endpoint, a liveness probe and the
//! envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
