//! JSON error envelope returned by every failing route.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docgen_core::{DocgenError, ErrorKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: ErrorKind,
    message: &'a str,
}

/// A failure ready to be rendered as `{success: false, error, message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    /// Maps a pipeline error to its HTTP form.
    ///
    /// Upstream, configuration and internal failures are logged in full and
    /// replaced by a generic message unless `expose_details` is set.
    pub fn from_error(error: DocgenError, expose_details: bool) -> Self {
        let status = status_for(&error);
        let kind = error.kind();

        if error.is_client_facing() {
            tracing::debug!(error = %error, kind = %kind, "request rejected");
            return Self { status, kind, message: client_message(&error) };
        }

        tracing::error!(error = %error, kind = %kind, status = status.as_u16(), "request failed");
        let message = if expose_details { error.to_string() } else { generic_message(kind) };
        Self { status, kind, message }
    }

    /// Inbound API key missing or wrong.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind: ErrorKind::AuthError,
            message: "Invalid or missing API key".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn status_for(error: &DocgenError) -> StatusCode {
    match error {
        DocgenError::Validation(_) => StatusCode::BAD_REQUEST,
        DocgenError::NotFound(_) => StatusCode::NOT_FOUND,
        DocgenError::Auth { forbidden: true, .. } => StatusCode::FORBIDDEN,
        DocgenError::Auth { .. } => StatusCode::UNAUTHORIZED,
        DocgenError::Fetch { timed_out: true, .. }
        | DocgenError::Generation { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
        DocgenError::Fetch { .. } | DocgenError::Generation { .. } => StatusCode::BAD_GATEWAY,
        DocgenError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        DocgenError::Serde(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The bare message, without the `Display` prefix naming the category.
fn client_message(error: &DocgenError) -> String {
    match error {
        DocgenError::Validation(message) | DocgenError::NotFound(message) => message.clone(),
        DocgenError::Auth { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn generic_message(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::FetchError => "Failed to fetch project data",
        ErrorKind::GenerationError => "Failed to generate document",
        ErrorKind::ConfigurationError => "Document generation is not configured",
        _ => "Internal server error",
    }
    .to_string()
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; every other rejection is a 400.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            kind: ErrorKind::ValidationError,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, error: self.kind, message: &self.message };
        (self.status, Json(body)).into_response()
    }
}
