//! Client configuration.
//!
//! The API base URL is injected once and shared by every endpoint builder;
//! nothing in the core reads it from a global.

use crate::error::ConfigError;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "USER_API_BASE_URL";

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for `UserClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin plus optional path prefix, without a trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Load configuration from the process environment.
    ///
    /// | Env Var             | Default                 |
    /// |---------------------|-------------------------|
    /// | `USER_API_BASE_URL` | `http://localhost:3000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(BASE_URL_ENV) {
            Some(url) => Self::new(&url),
            None => {
                tracing::info!("{BASE_URL_ENV} not set, using default: {DEFAULT_BASE_URL}");
                Self::new(DEFAULT_BASE_URL)
            }
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slashes() {
        let config = ClientConfig::new("http://api.local/v1//").unwrap();
        assert_eq!(config.base_url, "http://api.local/v1");
    }

    #[test]
    fn new_rejects_empty_and_schemeless() {
        assert!(matches!(ClientConfig::new("  "), Err(ConfigError::EmptyBaseUrl)));
        assert!(matches!(
            ClientConfig::new("api.local"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn lookup_falls_back_to_default() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn lookup_reads_base_url_variable() {
        let config = ClientConfig::from_lookup(|key| {
            (key == BASE_URL_ENV).then(|| "https://users.example.com/".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url, "https://users.example.com");
    }
}
