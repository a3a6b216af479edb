//! Configuration types for hookrelay.
//!
//! `GatewayConfig` represents the top-level `config.toml`. Every field has a
//! serde default, so an empty file (or no file) yields a working deployment
//! for the default organization.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::workflow::WorkflowState;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub credentials: CredentialEnvConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        if self.github.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("github.api_base_url is empty".into()));
        }
        if self.github.timeout_secs == 0 {
            return Err(ConfigError::Invalid("github.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Listener settings for `hookrelay serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Behaviour of the webhook pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stored credentials are encrypted and need the `key` query parameter.
    #[serde(default = "default_true")]
    pub require_encryption: bool,

    /// Deliveries must carry a valid `X-Hub-Signature-256` header.
    #[serde(default = "default_true")]
    pub require_signature: bool,

    /// Only repositories whose full name starts with this prefix are served.
    #[serde(default = "default_repo_prefix")]
    pub allowed_repo_prefix: String,

    /// Event names treated as the issue family.
    #[serde(default = "default_issue_event_names")]
    pub issue_event_names: Vec<String>,

    #[serde(default)]
    pub dispatch: DispatchTarget,

    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

fn default_true() -> bool {
    true
}

fn default_repo_prefix() -> String {
    "roc-streaming/".to_string()
}

fn default_issue_event_names() -> Vec<String> {
    vec!["issues".to_string()]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            require_encryption: true,
            require_signature: true,
            allowed_repo_prefix: default_repo_prefix(),
            issue_event_names: default_issue_event_names(),
            dispatch: DispatchTarget::default(),
            keepalive: KeepaliveConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_repo_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "pipeline.allowed_repo_prefix must not be empty".into(),
            ));
        }
        if !is_owner_prefix(&self.allowed_repo_prefix) {
            return Err(ConfigError::Invalid(format!(
                "pipeline.allowed_repo_prefix must have the form \"owner/\", got \"{}\"",
                self.allowed_repo_prefix
            )));
        }
        if let DispatchTarget::Hub { repository } = &self.dispatch {
            if repository.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "pipeline.dispatch.repository is required for mode = \"hub\"".into(),
                ));
            }
        }
        if self.keepalive.enabled && self.keepalive.allowed_states.is_empty() {
            return Err(ConfigError::Invalid(
                "pipeline.keepalive.allowed_states must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn is_issue_event(&self, event: &str) -> bool {
        self.issue_event_names.iter().any(|name| name == event)
    }
}

/// `owner/`: one non-blank segment followed by exactly one slash.
fn is_owner_prefix(prefix: &str) -> bool {
    prefix
        .strip_suffix('/')
        .is_some_and(|owner| !owner.trim().is_empty() && !owner.contains('/'))
}

/// Where dispatch events are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchTarget {
    /// Back to the repository the delivery came from.
    #[default]
    Direct,
    /// To a fixed hub repository, tagged with the source repository.
    Hub {
        #[serde(default)]
        repository: String,
    },
}

/// Workflow keepalive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    /// When false, `workflow_run` deliveries are ignored.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_allowed_states")]
    pub allowed_states: Vec<WorkflowState>,

    #[serde(default = "default_definitions_dir")]
    pub definitions_dir: String,
}

fn default_allowed_states() -> Vec<WorkflowState> {
    vec![WorkflowState::Active, WorkflowState::DisabledInactivity]
}

fn default_definitions_dir() -> String {
    ".github/workflows/".to_string()
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_states: default_allowed_states(),
            definitions_dir: default_definitions_dir(),
        }
    }
}

/// Provider REST API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "hookrelay".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Names of the environment variables holding the stored credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialEnvConfig {
    #[serde(default = "default_webhook_secret_env")]
    pub webhook_secret_env: String,
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,
}

fn default_webhook_secret_env() -> String {
    "GH_SECRET".to_string()
}

fn default_api_token_env() -> String {
    "GH_TOKEN".to_string()
}

impl Default for CredentialEnvConfig {
    fn default() -> Self {
        Self {
            webhook_secret_env: default_webhook_secret_env(),
            api_token_env: default_api_token_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.pipeline.require_encryption);
        assert!(config.pipeline.require_signature);
        assert_eq!(config.pipeline.allowed_repo_prefix, "roc-streaming/");
        assert_eq!(config.pipeline.issue_event_names, vec!["issues"]);
        assert_eq!(config.pipeline.dispatch, DispatchTarget::Direct);
        assert_eq!(config.github.timeout_secs, 30);
        assert_eq!(config.credentials.webhook_secret_env, "GH_SECRET");
        assert_eq!(config.credentials.api_token_env, "GH_TOKEN");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_config_deserialize_empty() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(
            config.pipeline.keepalive.allowed_states,
            vec![WorkflowState::Active, WorkflowState::DisabledInactivity]
        );
        assert_eq!(config.pipeline.keepalive.definitions_dir, ".github/workflows/");
    }

    #[test]
    fn test_gateway_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 9000

[pipeline]
require_encryption = false
allowed_repo_prefix = "acme/"
issue_event_names = ["issues", "issue"]

[pipeline.dispatch]
mode = "hub"
repository = "acme/hub"

[pipeline.keepalive]
allowed_states = ["active"]

[github]
api_base_url = "http://127.0.0.1:3000"
timeout_secs = 5
"#;
        let config: GatewayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.pipeline.require_encryption);
        assert!(config.pipeline.require_signature);
        assert!(config.pipeline.is_issue_event("issue"));
        assert!(!config.pipeline.is_issue_event("issue_comment"));
        assert_eq!(
            config.pipeline.dispatch,
            DispatchTarget::Hub {
                repository: "acme/hub".to_string()
            }
        );
        assert_eq!(
            config.pipeline.keepalive.allowed_states,
            vec![WorkflowState::Active]
        );
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.github.user_agent, "hookrelay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = GatewayConfig::default();
        config.pipeline.allowed_repo_prefix = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("allowed_repo_prefix"));
    }

    #[test]
    fn test_validate_rejects_prefix_without_owner_slash() {
        for prefix in ["roc-streaming", "/", "roc-streaming/roc-toolkit/", "acme//"] {
            let mut config = GatewayConfig::default();
            config.pipeline.allowed_repo_prefix = prefix.to_string();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("owner/"), "{prefix}");
        }
    }

    #[test]
    fn test_validate_accepts_owner_prefix() {
        let mut config = GatewayConfig::default();
        config.pipeline.allowed_repo_prefix = "acme/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_hub_without_repository() {
        let config: GatewayConfig = toml::from_str(
            r#"
[pipeline.dispatch]
mode = "hub"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dispatch.repository"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = GatewayConfig::default();
        config.github.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_dispatch_mode_fails_to_parse() {
        let result: Result<GatewayConfig, _> = toml::from_str(
            r#"
[pipeline.dispatch]
mode = "broadcast"
"#,
        );
        assert!(result.is_err());
    }
}
