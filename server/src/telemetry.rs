//! Logging setup.
//!
//! Console logging is always on and filtered through `RUST_LOG`. When
//! `OTEL_EXPORTER_OTLP_ENDPOINT` points at a reachable collector, traces and
//! log records are exported there as well.

use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVICE_NAME: &str = "foodgram-server";
const DEFAULT_FILTER: &str = "info,foodgram_server=debug,tower_http=info";

/// Exporters that must be flushed before the process exits.
#[derive(Default)]
pub struct TelemetryGuard {
    providers: Option<(SdkTracerProvider, SdkLoggerProvider)>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some((traces, logs)) = self.providers.take() {
            if let Err(e) = traces.shutdown() {
                eprintln!("Failed to flush traces: {e}");
            }
            if let Err(e) = logs.shutdown() {
                eprintln!("Failed to flush logs: {e}");
            }
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Strip the scheme and resolve; true when a TCP connection succeeds quickly.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

pub fn init_telemetry() -> anyhow::Result<TelemetryGuard> {
    let fmt_layer = tracing_subscriber::fmt::layer();

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()?;
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return Ok(TelemetryGuard::default());
    };

    if !collector_reachable(&endpoint) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()?;
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return Ok(TelemetryGuard::default());
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let tracer = trace_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider.clone());

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()?;

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .try_init()?;

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );

    Ok(TelemetryGuard {
        providers: Some((trace_provider, log_provider)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_collector_is_unreachable() {
        assert!(!collector_reachable("http://collector.invalid:4317"));
    }
}
