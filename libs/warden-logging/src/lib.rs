#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Diagnostic event filtering for Warden services.
//!
//! - [`DiagnosticFilter`] - priority-ordered rule list deciding emit/suppress
//! - [`LogEvent`] - the (severity, source, failure) triple a rule inspects
//! - [`init_logging`] - installs the `tracing` subscriber with the filter attached
//!
//! The filter also implements `tracing_subscriber::layer::Filter`, so it can be
//! attached to any layer:
//!
//! ```ignore
//! let layer = tracing_subscriber::fmt::layer().with_filter(DiagnosticFilter::standard());
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod init;
pub mod layer;
pub mod targets;

pub use config::{LogFormat, LoggingConfig};
pub use diagnostics::{
    DiagnosticFilter, EventMatch, Failure, FilterRule, LogEvent, Severity, Verdict,
};
pub use error::LoggingError;
pub use init::init_logging;
