//! Client configuration

/// Default backend address used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration for connecting to the store backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | TILL_API_URL | http://localhost:3001 | Backend base URL |
/// | TILL_API_TIMEOUT_SECS | 10 | Per-request timeout |
/// | TILL_API_TOKEN | (unset) | Bearer token sent with every request |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3001")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("TILL_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        );
        if let Some(timeout) = lookup("TILL_API_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok())
        {
            config.timeout = timeout;
        }
        config.token = lookup("TILL_API_TOKEN").filter(|v| !v.is_empty());
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create a network HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.timeout, 10);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TILL_API_URL", "http://store.local:8080/"),
            ("TILL_API_TIMEOUT_SECS", "3"),
            ("TILL_API_TOKEN", "secret"),
        ]));
        assert_eq!(config.base_url, "http://store.local:8080/");
        assert_eq!(config.timeout, 3);
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[("TILL_API_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
    }
}
