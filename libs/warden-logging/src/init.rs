//! Logging bootstrap.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::LoggingError;

/// Install the global `tracing` subscriber.
///
/// Every event passes through the configured `DiagnosticFilter` before it
/// reaches the formatter.
///
/// # Errors
///
/// Returns [`LoggingError::Install`] if a global subscriber is already set.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = cfg.diagnostic_filter();

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match cfg.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
