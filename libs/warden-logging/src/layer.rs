//! `tracing` adapter for the [`DiagnosticFilter`].
//!
//! Maps a `tracing` event onto a [`LogEvent`]:
//!
//! | `tracing`                       | `LogEvent`            |
//! |---------------------------------|-----------------------|
//! | target                          | source                |
//! | `TRACE`, `DEBUG`                | `Debug`               |
//! | `INFO`                          | `Information`         |
//! | `WARN`                          | `Warning`             |
//! | `ERROR`                         | `Error`               |
//! | `ERROR` + `fatal = true`        | `Fatal`               |
//! | `error.kind`, `error.message`   | failure               |
//!
//! A field recorded as `dyn Error` supplies the failure message when
//! `error.message` is absent. Record the failure fields as `%` or `&str`;
//! a `?`-recorded string loses its surrounding quotes before matching.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata};
use tracing_subscriber::layer::{Context, Filter};

use crate::diagnostics::{DiagnosticFilter, Failure, LogEvent, Severity};

const FIELD_ERROR_KIND: &str = "error.kind";
const FIELD_ERROR_MESSAGE: &str = "error.message";
const FIELD_FATAL: &str = "fatal";

fn severity_of(level: Level, fatal: bool) -> Severity {
    match level {
        Level::ERROR if fatal => Severity::Fatal,
        Level::ERROR => Severity::Error,
        Level::WARN => Severity::Warning,
        Level::INFO => Severity::Information,
        _ => Severity::Debug,
    }
}

#[derive(Default)]
struct FailureFields {
    kind: Option<String>,
    message: Option<String>,
    error: Option<String>,
    fatal: bool,
}

impl FailureFields {
    fn failure(&self) -> Option<Failure<'_>> {
        let message = self.message.as_deref().or(self.error.as_deref());
        if self.kind.is_none() && message.is_none() {
            return None;
        }
        Some(Failure {
            kind: self.kind.as_deref().unwrap_or_default(),
            message: message.unwrap_or_default(),
        })
    }
}

impl Visit for FailureFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            FIELD_ERROR_KIND => self.kind = Some(value.to_owned()),
            FIELD_ERROR_MESSAGE => self.message = Some(value.to_owned()),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == FIELD_FATAL {
            self.fatal = value;
        }
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn std::error::Error + 'static)) {
        if self.error.is_none() {
            self.error = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            FIELD_ERROR_KIND => self.kind = Some(unquoted(format!("{value:?}"))),
            FIELD_ERROR_MESSAGE => self.message = Some(unquoted(format!("{value:?}"))),
            _ => {}
        }
    }
}

fn unquoted(text: String) -> String {
    match text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.to_owned(),
        None => text,
    }
}

impl<S> Filter<S> for DiagnosticFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        if !meta.is_event() {
            return true;
        }
        let level = *meta.level();
        self.could_emit(severity_of(level, false), meta.target())
            || (level == Level::ERROR && self.could_emit(Severity::Fatal, meta.target()))
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, S>) -> bool {
        let mut fields = FailureFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        let log_event = LogEvent {
            severity: severity_of(*meta.level(), fields.fatal),
            source: meta.target(),
            failure: fields.failure(),
        };
        self.should_emit(&log_event)
    }
}
