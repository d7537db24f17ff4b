//! Span helpers for the docgen request lifecycle.

use tracing::Span;

/// Span covering one inbound generation request.
///
/// # Example
/// ```
/// use docgen_telemetry::generation_request_span;
/// let span = generation_request_span("SPRINT_REPORT", "p1");
/// let _enter = span.enter();
/// ```
pub fn generation_request_span(document_type: &str, project_id: &str) -> Span {
    tracing::info_span!(
        "docgen.generate",
        document.type = document_type,
        project.id = project_id,
        otel.kind = "server"
    )
}

/// Span for one call to the project backend.
pub fn backend_fetch_span(route: &str) -> Span {
    tracing::info_span!("backend.fetch", http.route = route, otel.kind = "client")
}

/// Span for a generation model API call.
///
/// # Example
/// ```
/// use docgen_telemetry::model_call_span;
/// let span = model_call_span("gemini-2.0-flash");
/// let _enter = span.enter();
/// ```
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name, otel.kind = "client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_can_be_entered_without_subscriber() {
        let span = generation_request_span("SRS", "p1");
        let _enter = span.enter();
        let inner = backend_fetch_span("/project/{id}");
        let _inner = inner.enter();
        drop(model_call_span("gemini-2.0-flash"));
    }
}
