use authz_resolver_sdk::AuthZResolverError;
use thiserror::Error;

/// Startup errors of the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("scheme binding '{scheme}' is invalid: {reason}")]
    InvalidBinding { scheme: String, reason: String },

    #[error("scheme '{0}' is bound more than once")]
    DuplicateScheme(String),

    #[error("query parameter '{0}' is used by more than one scheme")]
    DuplicateQueryParameter(String),

    #[error("at least one scheme binding is required")]
    NoSchemes,

    #[error("rate limit must allow at least one request per second")]
    InvalidRateLimit,

    #[error(transparent)]
    Policy(#[from] AuthZResolverError),
}
