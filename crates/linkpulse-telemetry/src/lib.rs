//! Process-wide tracing setup shared by the linkpulse binaries.
//!
//! [`init`] installs a `tracing` subscriber made of an `EnvFilter` (driven by
//! `RUST_LOG`), a text or JSON formatter on stdout, and, when an OTLP
//! endpoint is configured, an OpenTelemetry span exporter. Records emitted
//! through the `log` facade are forwarded into the same pipeline.

mod config;
mod error;

pub use config::{LogFormat, TelemetryConfig};
pub use error::TelemetryError;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Flushes and shuts down span export when dropped.
///
/// Keep it alive for the lifetime of the process.
#[must_use = "dropping the guard shuts down span export"]
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {err}");
            }
        }
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_directive))
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let mut layers = Vec::new();

    let fmt_layer = match config.log_format {
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };
    layers.push(fmt_layer);

    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = tracer_provider(&config.service_name, endpoint)?;
            let tracer = provider.tracer(config.service_name.clone());
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            Some(provider)
        }
        None => None,
    };

    LogTracer::init().map_err(|e| TelemetryError::Install(e.to_string()))?;

    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::Install(e.to_string()))?;

    tracing::debug!(
        service_name = %config.service_name,
        log_format = %config.log_format,
        otlp = config.otlp_endpoint.is_some(),
        "telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}

fn tracer_provider(
    service_name: &str,
    endpoint: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .build())
}
