//! ProviderApi trait definition.
//!
//! The narrow slice of the provider REST API the gateway needs. Uses RPITIT
//! (native async fn in traits, Rust 2024 edition) like the rest of the ports.
//! The reqwest implementation lives in hookrelay-infra.

use std::future::Future;

use hookrelay_types::credential::Redacted;
use hookrelay_types::error::ApiError;
use hookrelay_types::event::{DispatchEcho, DispatchRequest};
use hookrelay_types::workflow::Workflow;

/// Authenticated calls against the provider, for a single repository.
pub trait ProviderApi: Send + Sync {
    /// All workflows registered in `repo`, in provider listing order.
    fn list_workflows(
        &self,
        repo: &str,
    ) -> impl Future<Output = Result<Vec<Workflow>, ApiError>> + Send;

    /// Raw text of the file at `path` on the default branch.
    fn fetch_content(
        &self,
        repo: &str,
        path: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Enable a workflow. Idempotent on the provider side.
    fn enable_workflow(
        &self,
        repo: &str,
        workflow_id: u64,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Send a repository-dispatch event. Non-2xx replies are `ApiError::Status`.
    fn create_dispatch(
        &self,
        repo: &str,
        request: &DispatchRequest,
    ) -> impl Future<Output = Result<DispatchEcho, ApiError>> + Send;
}

/// Builds a [`ProviderApi`] bound to a bearer token.
///
/// The token only exists in plaintext for the duration of one invocation,
/// so the pipeline connects after decryption instead of holding a client.
pub trait ApiConnector: Send + Sync {
    type Api: ProviderApi;

    fn connect(&self, token: &Redacted) -> Result<Self::Api, ApiError>;
}
