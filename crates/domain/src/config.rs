//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_INTERVAL_SECS,
    DEFAULT_RETRY_TIMEOUT_SECS,
};
use crate::types::Credentials;

/// SDK client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base endpoint every request path is resolved against
    pub endpoint: String,
    /// Transport-level timeout for a single HTTP call
    pub request_timeout_secs: u64,
    /// Total wall-clock budget handed to the retry policy
    pub retry_timeout_secs: u64,
    /// Constant wait between retry attempts
    pub retry_interval_secs: u64,
    pub user_agent: Option<String>,
    /// Integration credentials used for token grants
    #[serde(skip_serializing)]
    pub credentials: Option<Credentials>,
}

impl ClientConfig {
    /// Configuration pointing at the given endpoint, everything else default
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Self::default() }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn retry_timeout(&self) -> Duration {
        Duration::from_secs(self.retry_timeout_secs)
    }

    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_timeout_secs: DEFAULT_RETRY_TIMEOUT_SECS,
            retry_interval_secs: DEFAULT_RETRY_INTERVAL_SECS,
            user_agent: None,
            credentials: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_interval(), Duration::from_secs(5));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"endpoint": "http://localhost:9000"}"#).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.retry_interval_secs, DEFAULT_RETRY_INTERVAL_SECS);
    }

    #[test]
    fn test_credentials_never_serialized() {
        let config = ClientConfig {
            credentials: Some(Credentials::new("source", "secret")),
            ..ClientConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("credentials"));
    }
}
