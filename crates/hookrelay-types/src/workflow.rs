//! Provider-side automation workflows.
//!
//! Mirrors the shape returned by `GET /repos/{repo}/actions/workflows`.
//! Workflows are fetched fresh on every keepalive scan and never cached.

use serde::{Deserialize, Serialize};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A workflow registered in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Provider-assigned numeric ID.
    pub id: u64,
    /// Display name (the `name:` of the definition, or its path).
    pub name: String,
    /// Current enablement state.
    pub state: WorkflowState,
    /// Definition path relative to the repository root.
    pub path: String,
}

/// Response body of the workflow listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

/// Enablement state of a workflow.
///
/// Unknown provider states are kept verbatim in `Other` so configuration
/// can still name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowState {
    Active,
    /// Auto-disabled by the provider after the inactivity window.
    DisabledInactivity,
    /// Disabled by a human; keepalive must leave it alone.
    DisabledManually,
    DisabledFork,
    Deleted,
    Other(String),
}

impl WorkflowState {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowState::Active => "active",
            WorkflowState::DisabledInactivity => "disabled_inactivity",
            WorkflowState::DisabledManually => "disabled_manually",
            WorkflowState::DisabledFork => "disabled_fork",
            WorkflowState::Deleted => "deleted",
            WorkflowState::Other(s) => s,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "active" => WorkflowState::Active,
            "disabled_inactivity" => WorkflowState::DisabledInactivity,
            "disabled_manually" => WorkflowState::DisabledManually,
            "disabled_fork" => WorkflowState::DisabledFork,
            "deleted" => WorkflowState::Deleted,
            other => WorkflowState::Other(other.to_string()),
        })
    }
}

impl From<String> for WorkflowState {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl From<WorkflowState> for String {
    fn from(state: WorkflowState) -> Self {
        state.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_state_roundtrip_known() {
        for name in [
            "active",
            "disabled_inactivity",
            "disabled_manually",
            "disabled_fork",
            "deleted",
        ] {
            let state: WorkflowState = name.parse().unwrap();
            assert!(!matches!(state, WorkflowState::Other(_)), "{name}");
            assert_eq!(state.to_string(), name);
        }
    }

    #[test]
    fn test_workflow_state_keeps_unknown_verbatim() {
        let state: WorkflowState = "disabled_other".parse().unwrap();
        assert_eq!(state, WorkflowState::Other("disabled_other".to_string()));
        assert_eq!(state.as_str(), "disabled_other");
    }

    #[test]
    fn test_workflow_list_deserialize_provider_shape() {
        let json = r#"{
            "total_count": 2,
            "workflows": [
                {"id": 161335, "node_id": "MDg6V29ya2Zsb3cxNjEzMzU=", "name": "CI",
                 "path": ".github/workflows/ci.yml", "state": "active"},
                {"id": 269289, "name": "Nightly", "path": ".github/workflows/nightly.yml",
                 "state": "disabled_inactivity", "badge_url": "https://example.invalid"}
            ]
        }"#;
        let list: WorkflowList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total_count, 2);
        assert_eq!(list.workflows[0].state, WorkflowState::Active);
        assert_eq!(list.workflows[1].state, WorkflowState::DisabledInactivity);
        assert_eq!(list.workflows[1].path, ".github/workflows/nightly.yml");
    }

    #[test]
    fn test_workflow_state_serializes_as_string() {
        let json = serde_json::to_string(&WorkflowState::DisabledManually).unwrap();
        assert_eq!(json, "\"disabled_manually\"");
    }
}
