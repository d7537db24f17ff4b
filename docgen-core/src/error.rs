use serde::Serialize;

/// Stable, client-visible error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
pub enum ErrorKind {
    ValidationError,
    NotFoundError,
    AuthError,
    FetchError,
    GenerationError,
    ConfigurationError,
    InternalError,
}

#[derive(Debug, thiserror::Error)]
pub enum DocgenError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The project backend (or this service) rejected the credential.
    #[error("Authentication error: {message}")]
    Auth { message: String, forbidden: bool },

    #[error("Fetch error: {message}")]
    Fetch { message: String, timed_out: bool },

    #[error("Generation error: {message}")]
    Generation { message: String, timed_out: bool },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl DocgenError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Auth { message: message.into(), forbidden: false }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Auth { message: message.into(), forbidden: true }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch { message: message.into(), timed_out: false }
    }

    pub fn fetch_timeout(message: impl Into<String>) -> Self {
        Self::Fetch { message: message.into(), timed_out: true }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation { message: message.into(), timed_out: false }
    }

    pub fn generation_timeout(message: impl Into<String>) -> Self {
        Self::Generation { message: message.into(), timed_out: true }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFoundError,
            Self::Auth { .. } => ErrorKind::AuthError,
            Self::Fetch { .. } => ErrorKind::FetchError,
            Self::Generation { .. } => ErrorKind::GenerationError,
            Self::Config(_) => ErrorKind::ConfigurationError,
            Self::Serde(_) => ErrorKind::InternalError,
        }
    }

    /// True for upstream failures caused by an expired timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Fetch { timed_out: true, .. } | Self::Generation { timed_out: true, .. }
        )
    }

    /// Whether the message may be shown to callers without leaking upstream detail.
    pub fn is_client_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_) | Self::Auth { .. })
    }
}

pub type Result<T> = std::result::Result<T, DocgenError>;
