//! Diagnostic Event Filter.
//!
//! Decides whether a log event reaches the sink. The decision is a priority
//! ordered list of rules (first match wins) falling back to a baseline
//! severity threshold. It depends only on the event itself, never on event
//! ordering or process state.

use serde::{Deserialize, Serialize};

use crate::targets;

/// Event severity, ordered `Debug < Information < Warning < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    #[serde(alias = "info")]
    Information,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Fatal,
}

/// Failure attached to a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure<'a> {
    /// Failure classification (e.g. `security-token-validation`); empty if unknown.
    pub kind: &'a str,
    pub message: &'a str,
}

/// A log event as seen by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    pub severity: Severity,
    /// Source component (the `tracing` target).
    pub source: &'a str,
    pub failure: Option<Failure<'a>>,
}

impl<'a> LogEvent<'a> {
    #[must_use]
    pub fn new(severity: Severity, source: &'a str) -> Self {
        Self {
            severity,
            source,
            failure: None,
        }
    }

    #[must_use]
    pub fn with_failure(mut self, kind: &'a str, message: &'a str) -> Self {
        self.failure = Some(Failure { kind, message });
        self
    }
}

/// Conjunction of conditions over an event. Unset conditions always hold, so
/// an empty match is a catch-all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventMatch {
    /// Failure kind must equal this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<String>,
    /// Failure message must equal this value exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    /// Source component must contain this identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_contains: Option<String>,
    /// Severity must equal this level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl EventMatch {
    fn inspects_failure(&self) -> bool {
        self.failure_kind.is_some() || self.failure_message.is_some()
    }

    fn matches_source_and_severity(&self, severity: Severity, source: &str) -> bool {
        self.severity.is_none_or(|s| s == severity)
            && self
                .source_contains
                .as_deref()
                .is_none_or(|id| source.contains(id))
    }

    fn matches(&self, event: &LogEvent<'_>) -> bool {
        if !self.matches_source_and_severity(event.severity, event.source) {
            return false;
        }
        if !self.inspects_failure() {
            return true;
        }
        let Some(failure) = event.failure else {
            return false;
        };
        self.failure_kind
            .as_deref()
            .is_none_or(|kind| failure.kind == kind)
            && self
                .failure_message
                .as_deref()
                .is_none_or(|message| failure.message == message)
    }
}

/// What a matching rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Emit,
    Suppress,
    /// Emit only events at or above the given severity.
    AtLeast(Severity),
}

impl Verdict {
    fn permits(self, severity: Severity) -> bool {
        match self {
            Self::Emit => true,
            Self::Suppress => false,
            Self::AtLeast(min) => severity >= min,
        }
    }
}

/// One `(predicate, decision)` pair of the rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRule {
    pub when: EventMatch,
    pub then: Verdict,
}

impl FilterRule {
    #[must_use]
    pub fn new(when: EventMatch, then: Verdict) -> Self {
        Self { when, then }
    }
}

/// Priority-ordered rule list with a baseline threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticFilter {
    rules: Vec<FilterRule>,
    baseline: Severity,
}

impl Default for DiagnosticFilter {
    fn default() -> Self {
        Self::standard()
    }
}

impl DiagnosticFilter {
    /// Rules applied to every Warden service:
    ///
    /// 1. token-validation failures and stale security stamps are suppressed;
    /// 2. informational events of the rate limiter are emitted;
    /// 3. the token-request validator only emits above `Error`;
    /// 4. everything else emits at `Error` and above.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(standard_rules(), Severity::Error)
    }

    #[must_use]
    pub fn new(rules: Vec<FilterRule>, baseline: Severity) -> Self {
        Self { rules, baseline }
    }

    /// Append rules after the existing ones (before the baseline fallback).
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = FilterRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: Severity) -> Self {
        self.baseline = baseline;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    #[must_use]
    pub fn baseline(&self) -> Severity {
        self.baseline
    }

    /// Decide whether `event` reaches the sink.
    #[must_use]
    pub fn should_emit(&self, event: &LogEvent<'_>) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.when.matches(event))
            .map_or(event.severity >= self.baseline, |rule| {
                rule.then.permits(event.severity)
            })
    }

    /// Whether some event with this severity and source could be emitted,
    /// whatever failure it carries.
    ///
    /// Rules that inspect the failure may or may not match, so they only
    /// answer when they would emit.
    #[must_use]
    pub fn could_emit(&self, severity: Severity, source: &str) -> bool {
        for rule in &self.rules {
            if !rule.when.matches_source_and_severity(severity, source) {
                continue;
            }
            if rule.when.inspects_failure() {
                if rule.then.permits(severity) {
                    return true;
                }
                continue;
            }
            return rule.then.permits(severity);
        }
        severity >= self.baseline
    }
}

fn standard_rules() -> Vec<FilterRule> {
    vec![
        FilterRule::new(
            EventMatch {
                failure_kind: Some(targets::SECURITY_TOKEN_VALIDATION.to_owned()),
                ..EventMatch::default()
            },
            Verdict::Suppress,
        ),
        FilterRule::new(
            EventMatch {
                failure_message: Some(targets::BAD_SECURITY_STAMP.to_owned()),
                ..EventMatch::default()
            },
            Verdict::Suppress,
        ),
        FilterRule::new(
            EventMatch {
                source_contains: Some(targets::RATE_LIMIT.to_owned()),
                severity: Some(Severity::Information),
                ..EventMatch::default()
            },
            Verdict::Emit,
        ),
        FilterRule::new(
            EventMatch {
                source_contains: Some(targets::TOKEN_REQUEST_VALIDATOR.to_owned()),
                ..EventMatch::default()
            },
            Verdict::AtLeast(Severity::Fatal),
        ),
    ]
}
