//! Span and log providers with OTLP export.

use std::time::Duration;

use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{Context, InstrumentationScope, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, SdkTracer, SdkTracerProvider,
};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::schema::TelemetryConfig;

/// Error type for telemetry shutdown.
///
/// A span-flush failure and a log-flush failure are independent; when both
/// occur, both are carried.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("trace provider shutdown failed: {0}")]
    Trace(#[source] opentelemetry_sdk::error::OTelSdkError),

    #[error("log provider shutdown failed: {0}")]
    Logs(#[source] opentelemetry_sdk::error::OTelSdkError),

    #[error("trace provider shutdown failed: {trace}; log provider shutdown failed: {logs}")]
    Both {
        trace: opentelemetry_sdk::error::OTelSdkError,
        logs: opentelemetry_sdk::error::OTelSdkError,
    },
}

/// Process-wide telemetry handle.
///
/// Owns the tracer and logger providers plus the W3C context propagator,
/// and is shared by `Arc` with every component that creates spans, emits
/// correlated logs, or moves trace context across a process boundary.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    logger_provider: SdkLoggerProvider,
    propagator: TraceContextPropagator,
    tracer: SdkTracer,
}

impl Telemetry {
    /// Build providers bound to the configured OTLP endpoint and install
    /// the global subscriber bridged to the log provider.
    ///
    /// Exporter construction failure is logged and the corresponding
    /// provider is built without export; tracing failures must never
    /// prevent the service from starting.
    pub fn init(config: &TelemetryConfig) -> Self {
        let resource = Resource::builder()
            .with_attribute(KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                config.service_name.clone(),
            ))
            .build();

        // Logs come first: once the subscriber is up, the remaining
        // telemetry pieces can report their own failures through it.
        let logger_provider = build_logger_provider(config, resource.clone());
        super::logging::init(&logger_provider);
        let tracer_provider = build_tracer_provider(config, resource);

        Self::from_parts(tracer_provider, logger_provider)
    }

    /// Assemble a handle from already-built providers.
    ///
    /// Tests use this to substitute in-memory exporters.
    pub fn from_parts(
        tracer_provider: SdkTracerProvider,
        logger_provider: SdkLoggerProvider,
    ) -> Self {
        let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
            .build();
        let tracer = tracer_provider.tracer_with_scope(scope);

        Self {
            tracer_provider,
            logger_provider,
            propagator: TraceContextPropagator::new(),
            tracer,
        }
    }

    /// Tracer used for every span this service creates.
    pub fn tracer(&self) -> &SdkTracer {
        &self.tracer
    }

    pub fn logger_provider(&self) -> &SdkLoggerProvider {
        &self.logger_provider
    }

    /// Extract the remote trace context carried by inbound request headers.
    pub fn extract_context(&self, headers: &HeaderMap) -> Context {
        self.propagator.extract(&HeaderExtractor(headers))
    }

    /// Inject `cx` into outbound request headers as W3C `traceparent`.
    pub fn inject_context(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Flush buffered spans and logs and release exporter resources.
    ///
    /// Called once at process exit; blocks until the SDK's flush deadline
    /// elapses. Both provider results are reported.
    pub fn shutdown(&self) -> Result<(), ShutdownError> {
        let trace_result = self.tracer_provider.shutdown();
        let logs_result = self.logger_provider.shutdown();

        match (trace_result, logs_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(trace), Ok(())) => Err(ShutdownError::Trace(trace)),
            (Ok(()), Err(logs)) => Err(ShutdownError::Logs(logs)),
            (Err(trace), Err(logs)) => Err(ShutdownError::Both { trace, logs }),
        }
    }
}

fn build_tracer_provider(config: &TelemetryConfig, resource: Resource) -> SdkTracerProvider {
    let mut builder = SdkTracerProvider::builder().with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        match opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
        {
            Ok(exporter) => {
                let batch_config = BatchConfigBuilder::default()
                    .with_scheduled_delay(Duration::from_millis(config.batch_timeout_ms))
                    .build();
                let processor = BatchSpanProcessor::builder(exporter)
                    .with_batch_config(batch_config)
                    .build();
                builder = builder.with_span_processor(processor);
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    endpoint = %endpoint,
                    "Failed to build OTLP span exporter, continuing without trace export"
                );
            }
        }
    }

    builder.build()
}

fn build_logger_provider(config: &TelemetryConfig, resource: Resource) -> SdkLoggerProvider {
    let mut builder = SdkLoggerProvider::builder().with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        match opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
        {
            Ok(exporter) => {
                builder = builder.with_batch_exporter(exporter);
            }
            Err(err) => {
                // The subscriber is not installed yet at this point.
                eprintln!("Failed to build OTLP log exporter, continuing without log export: {err}");
            }
        }
    }

    builder.build()
}
