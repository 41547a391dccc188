//! Client configuration.
//!
//! Loaded from a TOML file, then overridden by `PREP_ADMIN_API_URL` and
//! `PREP_ADMIN_TOKEN`, then by explicit command-line flags.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Default API root when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "PREP_ADMIN_API_URL";

/// Environment variable supplying the access token.
pub const ENV_TOKEN: &str = "PREP_ADMIN_TOKEN";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Access token, with or without the `Bearer ` prefix.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Overrides the default `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| ApiError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Apply `PREP_ADMIN_API_URL` and `PREP_ADMIN_TOKEN` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply environment-style overrides from an arbitrary lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|value| !value.trim().is_empty()) {
            self.access_token = Some(token.trim().to_string());
        }
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// `Authorization` header value; a token that already carries the
    /// `Bearer ` prefix is sent verbatim.
    pub fn authorization_header(&self) -> Option<String> {
        let token = self.access_token.as_deref()?.trim();
        if token.is_empty() {
            None
        } else if token.starts_with(BEARER_PREFIX) {
            Some(token.to_string())
        } else {
            Some(format!("{BEARER_PREFIX}{token}"))
        }
    }

    /// Parsed base URL. Rejects anything that is not absolute http(s).
    pub fn parsed_base_url(&self) -> Result<reqwest::Url> {
        let url = reqwest::Url::parse(self.base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::Config(format!(
                "unsupported URL scheme {other:?} in {:?}",
                self.base_url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.authorization_header(), None);
    }

    #[test]
    fn test_bearer_prefix_added_once() {
        let config = ApiConfig::default().with_access_token(Some("abc".to_string()));
        assert_eq!(config.authorization_header().as_deref(), Some("Bearer abc"));

        let config = ApiConfig::default().with_access_token(Some("Bearer abc".to_string()));
        assert_eq!(config.authorization_header().as_deref(), Some("Bearer abc"));

        let config = ApiConfig::default().with_access_token(Some("  ".to_string()));
        assert_eq!(config.authorization_header(), None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://admin.example.com/v1"),
            (ENV_TOKEN, " tok "),
        ]);
        let config = ApiConfig::default()
            .with_overrides_from(|name| env.get(name).map(|value| (*value).to_string()));
        assert_eq!(config.base_url, "https://admin.example.com/v1");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = ApiConfig::default().with_overrides_from(|_| Some(String::new()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.toml");
        std::fs::write(&path, "base_url = \"https://api.example.com/v1\"\ntimeout_secs = 5\n").unwrap();
        let config = ApiConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ApiConfig::load_from(Path::new("/nonexistent/admin.toml")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig::default().with_access_token(Some("secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(ApiConfig::default().parsed_base_url().is_ok());
        let config = ApiConfig::default().with_base_url("ftp://files.example.com");
        assert!(matches!(config.parsed_base_url(), Err(ApiError::Config(_))));
        let config = ApiConfig::default().with_base_url("/v1");
        assert!(config.parsed_base_url().is_err());
    }
}
