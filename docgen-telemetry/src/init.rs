//! Subscriber initialization

use std::sync::Once;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Environment variable selecting the console output format.
pub const LOG_FORMAT_ENV: &str = "DOC_AGENT_LOG_FORMAT";

/// Console output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Reads [`LOG_FORMAT_ENV`], falling back to [`LogFormat::Pretty`] for unset or unknown values.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV).ok().and_then(|v| v.trim().parse().ok()).unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn console_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
    }
}

/// Initialize console logging in the default format.
///
/// Later calls (from any `init_*` function) are no-ops.
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_with_format(service_name, LogFormat::default())
}

/// Initialize console logging in the given format.
///
/// # Example
/// ```
/// use docgen_telemetry::{init_with_format, LogFormat};
/// init_with_format("docgen", LogFormat::Json).expect("Failed to initialize telemetry");
/// ```
pub fn init_with_format(
    service_name: &str,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        tracing_subscriber::registry().with(env_filter()).with(console_layer(format)).init();

        tracing::info!(service.name = service_name, log.format = %format, "Telemetry initialized");
    });

    Ok(())
}

/// Initialize console logging plus span export to an OTLP collector.
///
/// # Arguments
/// * `service_name` - Reported as the `service.name` resource attribute
/// * `endpoint` - OTLP gRPC endpoint (e.g., "http://localhost:4317")
/// * `format` - Console output format
pub fn init_with_otlp(
    service_name: &str,
    endpoint: &str,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    use opentelemetry_otlp::WithExportConfig;
    use tracing_opentelemetry::OpenTelemetryLayer;

    let mut install_error = None;

    INIT.call_once(|| {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
            .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
                opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                    "service.name",
                    service_name.to_string(),
                )]),
            ))
            .install_batch(opentelemetry_sdk::runtime::Tokio);

        let tracer = match tracer {
            Ok(tracer) => tracer,
            Err(err) => {
                install_error = Some(err);
                return;
            }
        };

        tracing_subscriber::registry()
            .with(env_filter())
            .with(console_layer(format))
            .with(OpenTelemetryLayer::new(tracer))
            .init();

        tracing::info!(
            service.name = service_name,
            otlp.endpoint = endpoint,
            "Telemetry initialized with OpenTelemetry"
        );
    });

    match install_error {
        Some(err) => Err(Box::new(err)),
        None => Ok(()),
    }
}

/// Flush pending spans. Call before process exit when OTLP export is enabled.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
