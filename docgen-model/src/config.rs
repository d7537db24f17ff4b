//! Configuration for the Gemini generation client.

use std::fmt;
use std::time::Duration;

/// Default Gemini REST base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_MODEL: &str = "models/gemini-2.0-flash";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "DOC_AGENT_GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model id, with or without the `models/` prefix.
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Builds a config from the environment. Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let non_blank = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_ENV).or_else(|| non_blank(FALLBACK_API_KEY_ENV))?;
        let mut config = Self::new(api_key.trim());
        if let Some(model) = non_blank(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        config.base_url = non_blank(BASE_URL_ENV).map(|url| url.trim().to_string());
        Some(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GEMINI_API_BASE)
    }

    /// Model id without the `models/` resource prefix.
    pub fn model_name(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.effective_base_url())
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}
