//! GitHubClient -- concrete [`ProviderApi`] implementation over reqwest.
//!
//! The bearer token is wrapped in [`secrecy::SecretString`] and is only
//! exposed when building the `Authorization` header.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

use hookrelay_core::service::provider::{ApiConnector, ProviderApi};
use hookrelay_types::config::GitHubConfig;
use hookrelay_types::credential::Redacted;
use hookrelay_types::error::ApiError;
use hookrelay_types::event::{DispatchEcho, DispatchRequest};
use hookrelay_types::workflow::{Workflow, WorkflowList};

const PAGE_SIZE: usize = 100;

/// Builds [`GitHubClient`]s that share one connection pool.
#[derive(Clone)]
pub struct GitHubConnector {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubConnector {
    pub fn new(config: &GitHubConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Transport(format!("can't build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ApiConnector for GitHubConnector {
    type Api = GitHubClient;

    fn connect(&self, token: &Redacted) -> Result<GitHubClient, ApiError> {
        Ok(GitHubClient {
            client: self.client.clone(),
            token: SecretString::from(token.expose().to_string()),
            base_url: self.base_url.clone(),
        })
    }
}

/// Token-bound GitHub REST client.
pub struct GitHubClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl GitHubClient {
    const API_VERSION: &'static str = "2022-11-28";
    const ACCEPT_JSON: &'static str = "application/vnd.github+json";
    const ACCEPT_RAW: &'static str = "application/vnd.github.raw";

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str, accept: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", Self::API_VERSION)
    }

    /// Sends `request` and returns the status and body of a 2xx reply.
    async fn send(request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("can't read response body: {e}")))?;

        if !(200..300).contains(&status) {
            return Err(ApiError::Status { status, body });
        }
        Ok((status, body))
    }
}

impl ProviderApi for GitHubClient {
    async fn list_workflows(&self, repo: &str) -> Result<Vec<Workflow>, ApiError> {
        let url = self.url(&format!("/repos/{repo}/actions/workflows"));
        let mut workflows = Vec::new();
        let mut page = 1u32;

        loop {
            let request = self
                .request(Method::GET, &url, Self::ACCEPT_JSON)
                .query(&[("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())]);
            let (_, body) = Self::send(request).await?;
            let list: WorkflowList =
                serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

            let received = list.workflows.len();
            workflows.extend(list.workflows);
            tracing::debug!(repo, page, received, total = list.total_count, "workflow page");

            if received < PAGE_SIZE || workflows.len() as u64 >= list.total_count {
                break;
            }
            page += 1;
        }

        Ok(workflows)
    }

    async fn fetch_content(&self, repo: &str, path: &str) -> Result<String, ApiError> {
        let url = self.url(&format!("/repos/{repo}/contents/{}", encode_path(path)));
        let (_, body) = Self::send(self.request(Method::GET, &url, Self::ACCEPT_RAW)).await?;
        Ok(body)
    }

    async fn enable_workflow(&self, repo: &str, workflow_id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/repos/{repo}/actions/workflows/{workflow_id}/enable"));
        Self::send(self.request(Method::PUT, &url, Self::ACCEPT_JSON)).await?;
        Ok(())
    }

    async fn create_dispatch(
        &self,
        repo: &str,
        request: &DispatchRequest,
    ) -> Result<DispatchEcho, ApiError> {
        let url = self.url(&format!("/repos/{repo}/dispatches"));
        let (status, body) = Self::send(
            self.request(Method::POST, &url, Self::ACCEPT_JSON)
                .json(request),
        )
        .await?;
        Ok(DispatchEcho {
            url,
            request: request.clone(),
            response_status: status,
            response_body: body,
        })
    }
}

/// Percent-encode each segment of a repository path, keeping the slashes.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
