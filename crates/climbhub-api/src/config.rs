//! Client-side configuration for the backend connection.

use std::time::Duration;

/// Connection settings for [`HttpApi`](crate::HttpApi).
///
/// The surrounding application owns credentials and endpoint discovery;
/// this struct is just the handoff point.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. No retry is attempted on expiry; the failed
    /// intent rolls back and the caller decides whether to retry.
    pub request_timeout: Duration,
    /// Optional bearer token attached to every request.
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".into(),
            request_timeout: Duration::from_secs(10),
            auth_token: None,
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with default timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Base URL with any trailing slashes removed.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
