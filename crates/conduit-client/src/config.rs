use conduit_core::mask_secret;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://production.runalloy.com";
pub const DEFAULT_API_VERSION: &str = "2025-06";
pub const DEFAULT_USER_HEADER: &str = "x-alloy-userid";
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Connection settings for the remote connector API
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub api_version: String,
    /// Header carrying the caller identity on user-scoped calls
    pub user_header: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            user_id: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_header: DEFAULT_USER_HEADER.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), user_id: user_id.into(), ..Default::default() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Both the API key and the user id are required before any call is made
    pub fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.user_id.trim().is_empty()
    }

    /// Build from `CONDUIT_*` environment variables, keeping defaults for unset ones
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            base_url: var("CONDUIT_BASE_URL").unwrap_or(defaults.base_url),
            api_key: var("CONDUIT_API_KEY").unwrap_or_default(),
            user_id: var("CONDUIT_USER_ID").unwrap_or_default(),
            api_version: var("CONDUIT_API_VERSION").unwrap_or(defaults.api_version),
            user_header: defaults.user_header,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_secret(&self.api_key))
            .field("user_id", &self.user_id)
            .field("api_version", &self.api_version)
            .field("user_header", &self.user_header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_and_debug_masking() {
        assert!(!ApiConfig::default().is_valid());
        assert!(!ApiConfig::new("key", "  ").is_valid());

        let config = ApiConfig::new("sk_live_abcdef", "user-1");
        assert!(config.is_valid());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk_live_abcdef"));
        assert!(debug.contains("****cdef"));
    }
}
