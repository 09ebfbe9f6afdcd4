//! Client configuration.
//!
//! Values describe how URLs and headers are formed. The API version is not
//! configured here: each entity descriptor is pinned to its own version.

/// Library user agent, sent on every request.
pub const USER_AGENT: &str = concat!("shop-rest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL scheme, `https` unless talking to a local double.
    pub scheme: String,
    /// Path segment between the host and the API version.
    pub api_prefix: String,
    /// Prepended to [`USER_AGENT`] when set.
    pub user_agent_prefix: Option<String>,
    /// Headers attached to every request after the built-in ones.
    pub extra_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    #[must_use]
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.trim_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_user_agent_prefix(mut self, prefix: &str) -> Self {
        self.user_agent_prefix = Some(prefix.to_string());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn user_agent(&self) -> String {
        match &self.user_agent_prefix {
            Some(prefix) => format!("{prefix} | {USER_AGENT}"),
            None => USER_AGENT.to_string(),
        }
    }

    /// Base URL for `shop` at `api_version`, without a trailing slash.
    pub fn base_url(&self, shop: &str, api_version: &str) -> String {
        format!(
            "{}://{}/{}/{}",
            self.scheme,
            shop.trim_end_matches('/'),
            self.api_prefix,
            api_version
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            api_prefix: "admin/api".to_string(),
            user_agent_prefix: None,
            extra_headers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_https_admin_api() {
        let config = ClientConfig::default();
        assert_eq!(
            config.base_url("example.myshopify.com", "2024-01"),
            "https://example.myshopify.com/admin/api/2024-01"
        );
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new()
            .with_scheme("http")
            .with_api_prefix("/custom/api/")
            .with_user_agent_prefix("my-app");
        assert_eq!(config.base_url("127.0.0.1:3000/", "2023-10"), "http://127.0.0.1:3000/custom/api/2023-10");
        assert!(config.user_agent().starts_with("my-app | shop-rest/"));
    }
}
