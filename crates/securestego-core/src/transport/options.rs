use std::time::Duration;

/// Where the service lives, matches the default bind of the backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client configuration for talking to the service
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL all endpoint paths are joined onto
    pub base_url: String,

    /// Upper bound for a single request including the upload.
    /// Embedding large images can take a while on the service side.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
