//! Tracing subscriber setup with optional OTLP export.
//!
//! Logs are always written as JSON lines filtered by `RUST_LOG`. When an
//! OTLP endpoint is configured, spans are additionally exported through an
//! OpenTelemetry layer sitting next to the JSON formatter.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::TelemetryConfig;
use crate::error::AppError;

/// Holds the tracer provider so pending spans can be flushed on shutdown.
#[derive(Debug, Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported.
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }

    /// Flushes and shuts down the exporter, if any.
    pub fn shutdown(self) {
        let Some(provider) = self.tracer_provider else {
            return;
        };
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to shut down tracer provider");
        }
    }
}

fn tracer_provider(endpoint: &str, service_name: &str) -> Result<SdkTracerProvider, AppError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(format!("failed to build OTLP exporter: {e}")))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_owned())
                .build(),
        )
        .build())
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the OTLP exporter cannot be built or a
/// subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<TelemetryGuard, AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (tracer_provider, otel_layer) = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = tracer_provider(endpoint, &config.service_name)?;
            let tracer = provider.tracer(config.service_name.clone());
            (
                Some(provider),
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(fmt::layer().json())
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Telemetry(format!("failed to install subscriber: {e}")))?;

    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::info!(%endpoint, service_name = %config.service_name, "OTLP span export enabled");
    }
    Ok(TelemetryGuard { tracer_provider })
}
