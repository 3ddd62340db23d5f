//! Client configuration and endpoint resolution.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::github::error::{ClientError, Result};

/// Host name of the public GitHub API.
pub const GITHUB_COM_HOST: &str = "api.github.com";

/// Default timeout applied to every request when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a GitHub GraphQL client.
///
/// `host == "api.github.com"` targets the public cloud; any other host is
/// treated as a GitHub Enterprise installation whose API lives under `/api/`
/// and which must declare its version.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub access_token: SecretString,
    pub host: String,
    pub use_https: bool,
    pub ghe_version: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            host: host.into(),
            use_https: true,
            ghe_version: None,
            request_timeout: None,
        }
    }

    /// Configuration for the public GitHub API
    pub fn github_com(access_token: impl Into<String>) -> Self {
        Self::new(access_token, GITHUB_COM_HOST)
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_ghe_version(mut self, ghe_version: impl Into<String>) -> Self {
        self.ghe_version = Some(ghe_version.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn is_github_com(&self) -> bool {
        self.host == GITHUB_COM_HOST
    }

    /// Checks the construction-time invariants.
    ///
    /// The token and host must be non-empty, and an enterprise host must carry
    /// a non-empty version. The version string itself is not parsed here.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "access token is empty".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host is empty".to_string()));
        }
        if !self.is_github_com()
            && self
                .ghe_version
                .as_deref()
                .is_none_or(|v| v.trim().is_empty())
        {
            return Err(ClientError::InvalidConfig(format!(
                "GitHub Enterprise host '{}' requires a GHE version",
                self.host
            )));
        }
        Ok(())
    }

    /// Path prefix in front of `graphql`: empty for github.com, `api/` for enterprise hosts.
    pub fn path_prefix(&self) -> &'static str {
        if self.is_github_com() { "" } else { "api/" }
    }

    /// Resolves `http(s)://{host}/{prefix}graphql`.
    pub fn endpoint(&self) -> Result<Url> {
        let scheme = if self.use_https { "https" } else { "http" };
        let raw = format!("{}://{}/{}graphql", scheme, self.host, self.path_prefix());
        Url::parse(&raw).map_err(|e| {
            ClientError::InvalidConfig(format!("invalid GraphQL endpoint '{}': {}", raw, e))
        })
    }

    /// Version context for version-gated query construction.
    ///
    /// Empty for github.com, the configured version otherwise.
    pub fn ghe_version_context(&self) -> &str {
        if self.is_github_com() {
            ""
        } else {
            self.ghe_version.as_deref().unwrap_or_default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_com_endpoint() {
        let config = ClientConfig::github_com("token");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://api.github.com/graphql"
        );
        assert_eq!(config.path_prefix(), "");
        assert_eq!(config.ghe_version_context(), "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_github_com_ignores_configured_version() {
        let config = ClientConfig::github_com("token").with_ghe_version("3.9.0");
        assert_eq!(config.ghe_version_context(), "");
    }

    #[test]
    fn test_enterprise_endpoint() {
        for host in ["ghe.example.com", "github.corp.local", "127.0.0.1:8080"] {
            let config = ClientConfig::new("token", host).with_ghe_version("3.9.0");
            let endpoint = config.endpoint().unwrap();
            assert!(
                endpoint.as_str().ends_with("/api/graphql"),
                "unexpected endpoint {}",
                endpoint
            );
            assert_eq!(config.ghe_version_context(), "3.9.0");
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_plain_http_scheme() {
        let config = ClientConfig::new("token", "ghe.example.com")
            .with_https(false)
            .with_ghe_version("2.21.0");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://ghe.example.com/api/graphql"
        );
    }

    #[test]
    fn test_validate_rejects_missing_token_or_host() {
        let err = ClientConfig::github_com("").validate().unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));

        let err = ClientConfig::new("token", "").validate().unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_enterprise_without_version() {
        let err = ClientConfig::new("token", "ghe.example.com")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("requires a GHE version"));

        let err = ClientConfig::new("token", "ghe.example.com")
            .with_ghe_version("  ")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let config = ClientConfig::github_com("ghp_supersecret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_supersecret"));
    }

    #[test]
    fn test_request_timeout_default() {
        let config = ClientConfig::github_com("token");
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        let config = config.with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
