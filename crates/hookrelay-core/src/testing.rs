//! In-memory provider used by the scanner and pipeline tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use hookrelay_types::credential::Redacted;
use hookrelay_types::error::ApiError;
use hookrelay_types::event::{DispatchEcho, DispatchRequest};
use hookrelay_types::workflow::{Workflow, WorkflowState};

use crate::service::provider::{ApiConnector, ProviderApi};

/// Calls recorded by [`MockApi`], shared with every clone.
#[derive(Debug, Default)]
pub struct Calls {
    pub listed: Vec<String>,
    pub fetched: Vec<String>,
    pub enabled: Vec<u64>,
    pub dispatched: Vec<(String, DispatchRequest)>,
    pub tokens: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub workflows: Vec<Workflow>,
    pub contents: HashMap<String, String>,
    pub list_error: Option<ApiError>,
    pub enable_error: Option<(u64, ApiError)>,
    pub dispatch_status: Option<u16>,
    pub calls: Arc<Mutex<Calls>>,
}

impl MockApi {
    pub fn with_workflow(mut self, id: u64, name: &str, state: WorkflowState, path: &str) -> Self {
        self.workflows.push(Workflow {
            id,
            name: name.to_string(),
            state,
            path: path.to_string(),
        });
        self
    }

    pub fn with_content(mut self, path: &str, text: &str) -> Self {
        self.contents.insert(path.to_string(), text.to_string());
        self
    }

    pub fn enabled(&self) -> Vec<u64> {
        self.calls.lock().unwrap().enabled.clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.calls.lock().unwrap().fetched.clone()
    }

    pub fn dispatched(&self) -> Vec<(String, DispatchRequest)> {
        self.calls.lock().unwrap().dispatched.clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.calls.lock().unwrap().tokens.clone()
    }

    pub fn listed(&self) -> Vec<String> {
        self.calls.lock().unwrap().listed.clone()
    }
}

impl ProviderApi for MockApi {
    fn list_workflows(
        &self,
        repo: &str,
    ) -> impl Future<Output = Result<Vec<Workflow>, ApiError>> + Send {
        self.calls.lock().unwrap().listed.push(repo.to_string());
        let result = match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.workflows.clone()),
        };
        async move { result }
    }

    fn fetch_content(
        &self,
        _repo: &str,
        path: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send {
        self.calls.lock().unwrap().fetched.push(path.to_string());
        let result = self.contents.get(path).cloned().ok_or(ApiError::Status {
            status: 404,
            body: "{\"message\":\"Not Found\"}".to_string(),
        });
        async move { result }
    }

    fn enable_workflow(
        &self,
        _repo: &str,
        workflow_id: u64,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        let result = match &self.enable_error {
            Some((id, err)) if *id == workflow_id => Err(err.clone()),
            _ => {
                self.calls.lock().unwrap().enabled.push(workflow_id);
                Ok(())
            }
        };
        async move { result }
    }

    fn create_dispatch(
        &self,
        repo: &str,
        request: &DispatchRequest,
    ) -> impl Future<Output = Result<DispatchEcho, ApiError>> + Send {
        self.calls
            .lock()
            .unwrap()
            .dispatched
            .push((repo.to_string(), request.clone()));
        let status = self.dispatch_status.unwrap_or(204);
        let result = if (200..300).contains(&status) {
            Ok(DispatchEcho {
                url: format!("https://api.github.invalid/repos/{repo}/dispatches"),
                request: request.clone(),
                response_status: status,
                response_body: String::new(),
            })
        } else {
            Err(ApiError::Status {
                status,
                body: "{\"message\":\"Bad credentials\"}".to_string(),
            })
        };
        async move { result }
    }
}

/// Connector handing out clones of one [`MockApi`] and recording the token.
#[derive(Clone, Default)]
pub struct MockConnector {
    pub api: MockApi,
}

impl ApiConnector for MockConnector {
    type Api = MockApi;

    fn connect(&self, token: &Redacted) -> Result<MockApi, ApiError> {
        self.api
            .calls
            .lock()
            .unwrap()
            .tokens
            .push(token.expose().to_string());
        Ok(self.api.clone())
    }
}
