//! GitHub REST API adapter.
//!
//! `GitHubConnector` owns the shared HTTP client and hands out
//! token-bound `GitHubClient`s implementing [`ProviderApi`].
//!
//! [`ProviderApi`]: hookrelay_core::service::provider::ProviderApi

pub mod client;

pub use client::{GitHubClient, GitHubConnector};
