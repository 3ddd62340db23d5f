//! On-disk settings for the command line client.
//!
//! Settings live in `<config dir>/github-pulse/config.toml`. Every key is
//! optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::github::ClientConfig;
use crate::github::config::{DEFAULT_REQUEST_TIMEOUT, GITHUB_COM_HOST};

pub const TOKEN_ENV_VAR: &str = "GITHUB_PULSE_GITHUB_TOKEN";
pub const FALLBACK_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const SETTINGS_DIR_NAME: &str = "github-pulse";
const SETTINGS_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub github: GitHubSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub access_token: Option<String>,
    pub host: String,
    pub https: bool,
    pub ghe_version: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            host: GITHUB_COM_HOST.to_string(),
            https: true,
            ghe_version: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

/// `<config dir>/github-pulse/config.toml`, if the platform has a config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Loads the settings at `path`, or at the default location when `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_settings_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Replaces the token with one from the environment, if set.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = [TOKEN_ENV_VAR, FALLBACK_TOKEN_ENV_VAR]
            .into_iter()
            .filter_map(&lookup)
            .find(|token| !token.trim().is_empty());
        if token.is_some() {
            self.github.access_token = token;
        }
        self
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let github = &self.github;
        let token = github.access_token.clone().with_context(|| {
            format!(
                "No GitHub token configured. Set {} or add access_token to the settings file",
                TOKEN_ENV_VAR
            )
        })?;

        let mut config = ClientConfig::new(token, github.host.clone())
            .with_https(github.https)
            .with_request_timeout(Duration::from_secs(github.request_timeout_secs));
        if let Some(version) = &github.ghe_version {
            config = config.with_ghe_version(version.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.github.host, "api.github.com");
        assert!(settings.github.https);
        assert_eq!(settings.github.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_enterprise_settings() {
        let file = write_settings(
            r#"
            [github]
            access_token = "ghp_file"
            host = "github.acme.internal"
            https = false
            ghe_version = "3.9.0"
            "#,
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.github.request_timeout_secs, 30);

        let config = settings.client_config().unwrap();
        assert!(!config.is_github_com());
        assert_eq!(config.ghe_version_context(), "3.9.0");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://github.acme.internal/api/graphql"
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let file = write_settings("[github\nhost = ");
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_env_token_precedence() {
        let settings = Settings::default().apply_env_with(|key| match key {
            TOKEN_ENV_VAR => Some("ghp_pulse".to_string()),
            FALLBACK_TOKEN_ENV_VAR => Some("ghp_generic".to_string()),
            _ => None,
        });
        assert_eq!(settings.github.access_token.as_deref(), Some("ghp_pulse"));

        let settings = Settings::default().apply_env_with(|key| match key {
            TOKEN_ENV_VAR => Some(String::new()),
            FALLBACK_TOKEN_ENV_VAR => Some("ghp_generic".to_string()),
            _ => None,
        });
        assert_eq!(settings.github.access_token.as_deref(), Some("ghp_generic"));
    }

    #[test]
    fn test_env_keeps_file_token_when_unset() {
        let mut settings = Settings::default();
        settings.github.access_token = Some("ghp_file".to_string());
        let settings = settings.apply_env_with(|_| None);
        assert_eq!(settings.github.access_token.as_deref(), Some("ghp_file"));
    }

    #[test]
    fn test_client_config_requires_token() {
        let err = Settings::default().client_config().unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_client_config_rejects_enterprise_without_version() {
        let mut settings = Settings::default();
        settings.github.access_token = Some("ghp_file".to_string());
        settings.github.host = "github.acme.internal".to_string();
        assert!(settings.client_config().is_err());
    }
}
