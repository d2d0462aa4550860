//! Logging configuration.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticFilter, FilterRule, Severity};

/// Output format of the log sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Threshold for events no rule matches.
    pub baseline: Severity,
    /// Extra rules evaluated after the standard ones.
    pub rules: Vec<FilterRule>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            baseline: Severity::Error,
            rules: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Build the diagnostic filter described by this configuration.
    #[must_use]
    pub fn diagnostic_filter(&self) -> DiagnosticFilter {
        DiagnosticFilter::standard()
            .with_rules(self.rules.iter().cloned())
            .with_baseline(self.baseline)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::diagnostics::LogEvent;

    #[test]
    fn default_config_yields_standard_filter() {
        assert_eq!(
            LoggingConfig::default().diagnostic_filter(),
            DiagnosticFilter::standard()
        );
    }

    #[test]
    fn configured_rules_are_appended() {
        let cfg: LoggingConfig = serde_json::from_value(serde_json::json!({
            "format": "json",
            "rules": [
                {"when": {"source_contains": "billing"}, "then": "emit"}
            ]
        }))
        .unwrap();

        assert_eq!(cfg.format, LogFormat::Json);
        let filter = cfg.diagnostic_filter();
        assert_eq!(filter.rules().len(), DiagnosticFilter::standard().rules().len() + 1);
        assert!(filter.should_emit(&LogEvent::new(Severity::Debug, "warden::billing")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<LoggingConfig, _> =
            serde_json::from_value(serde_json::json!({"level": "info"}));
        assert!(res.is_err());
    }
}
