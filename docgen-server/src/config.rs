use docgen_core::DocumentPipeline;
use std::time::Duration;

pub const API_KEY_ENV: &str = "DOC_AGENT_API_KEY";
pub const API_KEY_HEADER_ENV: &str = "DOC_AGENT_API_KEY_HEADER";
pub const ALLOWED_ORIGINS_ENV: &str = "DOC_AGENT_ALLOWED_ORIGINS";
pub const EXPOSE_ERRORS_ENV: &str = "DOC_AGENT_EXPOSE_ERRORS";

pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Security configuration for the docgen server.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Allowed origins for CORS (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
    /// Whole-request timeout; should exceed the backend and generation timeouts combined (see [`SecurityConfig::covers`])
    pub request_timeout: Duration,
    /// Whether upstream failure details are returned to callers (default: false)
    pub expose_error_details: bool,
    /// Service API key required on documentation routes; `None` disables the check
    pub api_key: Option<String>,
    /// Header carrying the service API key (matched case-insensitively)
    pub api_key_header: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(180),
            expose_error_details: false,
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("allowed_origins", &self.allowed_origins)
            .field("max_body_size", &self.max_body_size)
            .field("request_timeout", &self.request_timeout)
            .field("expose_error_details", &self.expose_error_details)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_header", &self.api_key_header)
            .finish()
    }
}

fn env_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl SecurityConfig {
    /// Create a development configuration (permissive CORS, detailed errors)
    pub fn development() -> Self {
        Self { expose_error_details: true, ..Self::default() }
    }

    /// Reads the `DOC_AGENT_*` security variables on top of the defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.api_key = var(API_KEY_ENV).map(|key| key.trim().to_string());
        if let Some(header) = var(API_KEY_HEADER_ENV) {
            config.api_key_header = header.trim().to_string();
        }
        if let Some(origins) = var(ALLOWED_ORIGINS_ENV) {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        config.expose_error_details = var(EXPOSE_ERRORS_ENV).is_some_and(|v| env_flag(&v));
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Whether the request timeout leaves room for upstream calls taking `upstream`.
    pub fn covers(&self, upstream: Duration) -> bool {
        self.request_timeout > upstream
    }

    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }
}

/// Configuration for the docgen server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub pipeline: DocumentPipeline,
    pub security: SecurityConfig,
}

impl ServerConfig {
    pub fn new(pipeline: DocumentPipeline) -> Self {
        Self { pipeline, security: SecurityConfig::default() }
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// Configure allowed CORS origins
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.security.allowed_origins = origins;
        self
    }

    /// Configure maximum request body size
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.security.max_body_size = size;
        self
    }

    /// Configure request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.security.request_timeout = timeout;
        self
    }

    /// Return upstream error details to callers (for development only)
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.security.expose_error_details = expose;
        self
    }

    /// Require `key` in the API key header on documentation routes
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.security.api_key = Some(key.into());
        self
    }
}
