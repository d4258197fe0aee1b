//! Span helpers for alert and store operations.

use std::time::{Duration, Instant};
use tracing::{info_span, Span};

/// Create a span for an engine operation on an alert.
///
/// `alert_id` is left empty for operations that do not target one alert.
pub fn alert_span(operation: &'static str, alert_id: Option<&str>) -> Span {
    info_span!(
        "alert",
        op = operation,
        id = alert_id.unwrap_or(""),
        error = tracing::field::Empty
    )
}

/// Create a span for a storage backend call.
pub fn store_span(backend: &'static str, operation: &'static str) -> Span {
    info_span!("store", backend = backend, op = operation)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Complete the timer, log and return the duration.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Instrument;
    use tracing_subscriber::EnvFilter;

    fn with_subscriber<F>(f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::new("trace"))
            .finish();

        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_span_nesting_and_error_recording() {
        with_subscriber(|| {
            let alert = alert_span("update_status", Some("ALT-1-1"));
            let _outer = alert.enter();

            let store = store_span("sqlite", "update_status");
            let _inner = store.enter();

            let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
            record_error(&error);
            tracing::info!("nested operation");
        });
    }

    #[tokio::test]
    async fn test_span_propagates_across_await() {
        async {
            tracing::info!("inside alert span");
        }
        .instrument(alert_span("statistics", None))
        .await;
    }

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.finish() >= Duration::from_millis(5));
    }
}
