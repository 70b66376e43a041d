//! Application-level configuration constants.

// Race server
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

// Race timing
pub const POLL_INTERVAL_MS: u32 = 500;
pub const COUNTDOWN_START: u32 = 3;
pub const COUNTDOWN_TICK_MS: u32 = 1_000;
/// 1200 polls at 500ms is ten minutes of racing
pub const MAX_POLL_ATTEMPTS: u32 = 1_200;

/// Where the HTTP client sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for an API path such as `/api/tracks`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}
