//! Configuration loader for hookrelay.
//!
//! Reads `config.toml` (default `$XDG_CONFIG_HOME/hookrelay/config.toml`)
//! and deserializes it into [`GatewayConfig`]. A missing file means "all
//! defaults"; a file that exists but can't be read, parsed or validated is
//! an error.

use std::path::{Path, PathBuf};

use hookrelay_types::config::GatewayConfig;
use hookrelay_types::error::ConfigError;

const APP_DIR: &str = "hookrelay";
const FILE_NAME: &str = "config.toml";

/// Default location of the configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
}

/// Load and validate configuration from `path`.
pub async fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return Ok(GatewayConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<GatewayConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookrelay_types::config::DispatchTarget;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(FILE_NAME)).await.unwrap();
        assert_eq!(config.pipeline.allowed_repo_prefix, "roc-streaming/");
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(FILE_NAME);
        tokio::fs::write(
            &path,
            r#"
[pipeline]
allowed_repo_prefix = "acme/"

[pipeline.dispatch]
mode = "hub"
repository = "acme/hub"

[github]
timeout_secs = 10
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.pipeline.allowed_repo_prefix, "acme/");
        assert_eq!(
            config.pipeline.dispatch,
            DispatchTarget::Hub {
                repository: "acme/hub".to_string()
            }
        );
        assert_eq!(config.github.timeout_secs, 10);
    }

    #[tokio::test]
    async fn load_config_malformed_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(FILE_NAME);
        tokio::fs::write(&path, "[pipeline\nallowed_repo_prefix = ").await.unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_invalid_values_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(FILE_NAME);
        tokio::fs::write(&path, "[pipeline]\nallowed_repo_prefix = \"\"\n")
            .await
            .unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[tokio::test]
    async fn load_config_directory_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn default_config_path_ends_with_app_file() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("hookrelay/config.toml"));
        }
    }
}
