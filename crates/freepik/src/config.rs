use std::time::Duration;

/// Default public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.freepik.com";

/// Freepik connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FreepikConfig {
    pub api_key: String,
    /// API root without a trailing slash.
    pub base_url: String,
    /// Upper bound on every HTTP call.
    pub request_timeout: Duration,
}

impl FreepikConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                   |
    /// |--------------------------------|---------------------------|
    /// | `FREEPIK_API_KEY`              | empty                     |
    /// | `FREEPIK_BASE_URL`             | `https://api.freepik.com` |
    /// | `FREEPIK_REQUEST_TIMEOUT_SECS` | `30`                      |
    pub fn from_env() -> Self {
        let api_key = std::env::var("FREEPIK_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("FREEPIK_API_KEY is not set; provider calls will be rejected");
        }

        let base_url = std::env::var("FREEPIK_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs: u64 = std::env::var("FREEPIK_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("FREEPIK_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}
