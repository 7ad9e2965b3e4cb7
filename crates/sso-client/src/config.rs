//! Client configuration
//!
//! Explicit configuration for the identity API client, constructed once at
//! process start and passed into the client. Loadable from environment
//! variables with defaults suitable for the hosted provider.

use serde::{Deserialize, Serialize};

/// Default base URL of the hosted identity API.
pub const DEFAULT_BASE_URL: &str = "https://sso.froxlor.com/api/";

/// Identity API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoConfig {
    /// API base URL; paths are resolved relative to it
    pub base_url: String,

    /// OAuth client id, sent as the `Client-ID` header
    pub client_id: Option<String>,

    /// OAuth client secret, used by grant requests
    pub client_secret: Option<String>,

    /// Redirect URL for authorization-code flows
    pub redirect_url: Option<String>,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: None,
            client_secret: None,
            redirect_url: None,
        }
    }
}

impl SsoConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SSO_BASE_URL`: API base URL (default: the hosted provider)
    /// - `SSO_CLIENT_ID`: OAuth client id
    /// - `SSO_CLIENT_SECRET`: OAuth client secret
    /// - `SSO_REDIRECT_URL`: redirect URL for authorization-code flows
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SSO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            client_id: std::env::var("SSO_CLIENT_ID").ok(),
            client_secret: std::env::var("SSO_CLIENT_SECRET").ok(),
            redirect_url: std::env::var("SSO_REDIRECT_URL").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SsoConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.client_id.is_none());
        assert!(config.client_secret.is_none());
    }
}
