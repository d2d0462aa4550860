//! Error types for the `AuthZ` resolver module.

use thiserror::Error;

/// Configuration errors of the `AuthZ` resolver.
///
/// Access denial is expressed via [`crate::PolicyDecision::Deny`], never as
/// an error variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthZResolverError {
    /// A route referenced a policy that was never declared.
    #[error("unknown policy '{0}'")]
    UnknownPolicy(String),

    /// Two policies were declared with the same name.
    #[error("duplicate policy '{0}'")]
    DuplicatePolicy(String),

    /// A policy declaration is malformed.
    #[error("invalid policy '{name}': {reason}")]
    InvalidPolicy { name: String, reason: String },
}
