pub mod controllers;

pub use controllers::{DocumentationController, HealthController};

use crate::{ServerConfig, auth::require_api_key};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Slack between the generate handler's own deadline and the outer timeout layer,
/// so generation timeouts are answered with the JSON envelope.
const TIMEOUT_LAYER_GRACE: Duration = Duration::from_secs(1);

/// Build CORS layer based on security configuration
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut allowed_headers = vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE];
    if let Ok(name) = HeaderName::try_from(config.security.api_key_header.as_str()) {
        allowed_headers.push(name);
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers);

    if config.security.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.security.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// Create the docgen HTTP application.
pub fn create_app(config: ServerConfig) -> Router {
    let health_controller = HealthController::new(config.clone());
    let documentation_controller = DocumentationController::new(config.clone());

    let documentation_router = Router::new()
        .route("/types", get(controllers::documentation::list_types))
        .route("/structure/{document_type}", get(controllers::documentation::get_structure))
        .route("/types/{document_type}/structure", get(controllers::documentation::get_structure))
        .route("/generate", post(controllers::documentation::generate_document))
        .with_state(documentation_controller)
        .route_layer(middleware::from_fn_with_state(config.security.clone(), require_api_key));

    let app = Router::new()
        .route("/health", get(controllers::health::health))
        .route("/ready", get(controllers::health::ready))
        .with_state(health_controller)
        .nest("/api/documentation", documentation_router);

    let cors_layer = build_cors_layer(&config);

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                axum::http::StatusCode::GATEWAY_TIMEOUT,
                config.security.request_timeout + TIMEOUT_LAYER_GRACE,
            ))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(cors_layer)
            // Security headers
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("1; mode=block"),
            )),
    )
}
