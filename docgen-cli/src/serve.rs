use anyhow::{Context, Result};
use docgen_backend::{BackendClient, BackendConfig};
use docgen_core::DocumentPipeline;
use docgen_model::{GeminiConfig, GeminiGenerator};
use docgen_server::{SERVICE_NAME, SecurityConfig, ServerConfig, create_app};
use docgen_telemetry::{LogFormat, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Standard OpenTelemetry variable; span export is enabled when set.
const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

fn init_logging() {
    let format = LogFormat::from_env();
    let result = match std::env::var(OTLP_ENDPOINT_ENV).ok().filter(|v| !v.trim().is_empty()) {
        Some(endpoint) => docgen_telemetry::init_with_otlp(SERVICE_NAME, &endpoint, format),
        None => docgen_telemetry::init_with_format(SERVICE_NAME, format),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize telemetry: {}", e);
    }
}

/// Backend client from the environment, plus Gemini when a key is present.
pub fn pipeline_from_env() -> Result<DocumentPipeline> {
    let backend_config = BackendConfig::from_env();
    info!(backend = %backend_config.base_url, "project backend configured");
    let backend = BackendClient::new(backend_config).context("invalid project backend URL")?;
    let mut pipeline = DocumentPipeline::new(Arc::new(backend));

    match GeminiConfig::from_env() {
        Some(config) => {
            let generator = GeminiGenerator::new(config)?;
            info!(model = %generator.config().model, "generation model configured");
            pipeline = pipeline.with_generator(Arc::new(generator));
        }
        None => warn!("GEMINI_API_KEY is not set; generation requests will be rejected"),
    }
    Ok(pipeline)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

pub async fn run_serve(host: &str, port: u16) -> Result<()> {
    init_logging();

    let security = SecurityConfig::from_env();
    if security.allowed_origins.is_empty() {
        warn!("CORS allows any origin; set DOC_AGENT_ALLOWED_ORIGINS to restrict it");
    }
    if security.api_key.is_none() {
        warn!("DOC_AGENT_API_KEY is not set; documentation routes are unauthenticated");
    }

    let upstream = BackendConfig::from_env().max_call_duration()
        + GeminiConfig::from_env().map_or(Duration::ZERO, |gemini| gemini.timeout);
    if !security.covers(upstream) {
        warn!(
            request_timeout_secs = security.request_timeout.as_secs(),
            upstream_secs = upstream.as_secs(),
            "request timeout does not exceed the backend and generation timeouts combined"
        );
    }

    let config = ServerConfig::new(pipeline_from_env()?).with_security(security);
    let app = create_app(config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "docgen server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    docgen_telemetry::shutdown_telemetry();
    Ok(())
}
