//! Process-wide logging for the relay.
//!
//! Request and chat-turn spans are written as compact lines with their close
//! timing. With `--otel` the same spans are also exported through
//! OpenTelemetry to stdout.
//!
//! # Usage
//!
//! ```no_run
//! // `info` unless RUST_LOG says otherwise
//! chatrelay_observe::tracing_setup::init_tracing("info", false).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Instrumentation scope reported on exported spans.
const TRACER_NAME: &str = "chatrelay";

/// Kept so [`shutdown_tracing`] can flush the exporter on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` when set and valid, else `default_filter`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Compact log lines without targets; spans log once when they close.
fn log_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
}

/// Span exporter writing to stdout.
fn stdout_provider() -> SdkTracerProvider {
    SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build()
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let otel_layer = enable_otel.then(|| {
        let provider = stdout_provider();
        let layer = tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME));
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        layer
    });

    tracing_subscriber::registry()
        .with(build_filter(default_filter))
        .with(log_layer())
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush and shut down the span exporter. No-op without `--otel`.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_uses_default() {
        // RUST_LOG is unset in the test environment unless a developer sets it.
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_filter("warn,chatrelay=debug");
            assert!(filter.to_string().contains("chatrelay=debug"));
        }
    }

    #[test]
    fn test_layers_record_a_chat_span() {
        let provider = stdout_provider();
        let subscriber = tracing_subscriber::registry()
            .with(log_layer())
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME)));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("chat_turn", session_id = "abc123");
            span.in_scope(|| tracing::info!("reply stored"));
        });

        assert!(provider.shutdown().is_ok());
    }

    #[test]
    fn test_shutdown_without_init_is_noop() {
        shutdown_tracing();
    }
}
