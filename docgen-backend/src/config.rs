//! Configuration for the project backend client.

use crate::retry::RetryConfig;
use std::time::Duration;

/// Default project backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding [`DEFAULT_BACKEND_URL`].
pub const BACKEND_URL_ENV: &str = "NODE_BASE_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of activity log entries requested per fetch.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub activity_limit: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
        }
    }

    /// Reads [`BACKEND_URL_ENV`], falling back to the default URL when unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_activity_limit(mut self, limit: u32) -> Self {
        self.activity_limit = limit;
        self
    }

    /// Longest a single backend call can take, counting timed-out retries.
    pub fn max_call_duration(&self) -> Duration {
        let retries = if self.retry.enabled { self.retry.max_retries } else { 0 };
        self.timeout * (retries + 1) + self.retry.delay * retries
    }
}
