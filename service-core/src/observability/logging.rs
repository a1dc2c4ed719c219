use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::file_sink::{json_file_layer, open_log_file};

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory holding the append-only `app.log`. `None` disables the file sink.
    pub dir: Option<PathBuf>,
    /// OTLP collector endpoint. `None` disables trace export.
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            otlp_endpoint: None,
        }
    }
}

/// Install the global subscriber: JSON to stdout, JSON lines to the log file,
/// and OTLP export when configured.
///
/// Sink failures are reported on stderr and the sink is skipped; they never
/// prevent the service from starting.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let file_layer = config.dir.as_ref().and_then(|dir| match open_log_file(dir) {
        Ok(file) => Some(json_file_layer(file)),
        Err(e) => {
            eprintln!(
                "Failed to open log file in '{}' for service '{}': {}",
                dir.display(),
                service_name,
                e
            );
            None
        }
    });

    let tracer = config
        .otlp_endpoint
        .as_deref()
        .and_then(|endpoint| match otlp_tracer(service_name, endpoint) {
            Ok(tracer) => Some(tracer),
            Err(e) => {
                eprintln!(
                    "Failed to initialize OTLP tracer for service '{}' at endpoint '{}': {}",
                    service_name, endpoint, e
                );
                None
            }
        });
    let telemetry = tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();
}

fn otlp_tracer(
    service_name: &str,
    otlp_endpoint: &str,
) -> Result<sdktrace::Tracer, opentelemetry::trace::TraceError> {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}
