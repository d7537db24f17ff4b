//! Inbound service API key check.

use crate::config::SecurityConfig;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Rejects requests whose API key header does not match the configured key.
///
/// Passes everything through when no key is configured. Header names are
/// case-insensitive in `HeaderMap`, so any casing of the header is accepted.
pub async fn require_api_key(
    State(security): State<SecurityConfig>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = security.api_key.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(security.api_key_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    if provided == Some(expected) {
        next.run(request).await
    } else {
        tracing::warn!(
            path = %request.uri().path(),
            present = provided.is_some(),
            "rejected request with invalid API key"
        );
        ApiError::unauthorized().into_response()
    }
}
