//! Workflow keepalive scanner.
//!
//! The provider auto-disables scheduled workflows in repositories without
//! recent activity. Every completed workflow run triggers a scan that
//! re-enables each scheduled workflow before that happens.
//!
//! The scan is sequential and fail-fast: the first failing list, fetch, parse
//! or enable call aborts it and no partial result is returned.

use hookrelay_types::config::KeepaliveConfig;
use hookrelay_types::error::ScanError;
use hookrelay_types::workflow::Workflow;

use crate::service::provider::ProviderApi;
use crate::workflow::trigger::has_schedule_trigger;

pub struct KeepaliveScanner<'a, A: ProviderApi> {
    api: &'a A,
    config: &'a KeepaliveConfig,
}

impl<'a, A: ProviderApi> KeepaliveScanner<'a, A> {
    pub fn new(api: &'a A, config: &'a KeepaliveConfig) -> Self {
        Self { api, config }
    }

    /// Re-enable every scheduled workflow of `repo`.
    ///
    /// Returns the display names of re-armed workflows in listing order.
    #[tracing::instrument(skip_all, fields(repository = %repo))]
    pub async fn scan_and_rearm(&self, repo: &str) -> Result<Vec<String>, ScanError> {
        let workflows = self
            .api
            .list_workflows(repo)
            .await
            .map_err(ScanError::ListWorkflows)?;

        tracing::debug!(count = workflows.len(), "listed workflows");

        let mut rearmed = Vec::new();
        for workflow in workflows.iter().filter(|w| self.is_candidate(w)) {
            let definition = self
                .api
                .fetch_content(repo, &workflow.path)
                .await
                .map_err(|source| ScanError::FetchDefinition {
                    workflow: workflow.name.clone(),
                    source,
                })?;

            let scheduled =
                has_schedule_trigger(&definition).map_err(|e| ScanError::ParseDefinition {
                    workflow: workflow.name.clone(),
                    message: e.to_string(),
                })?;

            if !scheduled {
                tracing::debug!(workflow = %workflow.name, "no schedule trigger, skipping");
                continue;
            }

            self.api
                .enable_workflow(repo, workflow.id)
                .await
                .map_err(|source| ScanError::Rearm {
                    workflow: workflow.name.clone(),
                    source,
                })?;

            tracing::info!(workflow = %workflow.name, state = %workflow.state, "re-armed workflow");
            rearmed.push(workflow.name.clone());
        }

        Ok(rearmed)
    }

    fn is_candidate(&self, workflow: &Workflow) -> bool {
        self.config.allowed_states.contains(&workflow.state)
            && workflow.path.starts_with(&self.config.definitions_dir)
    }
}
