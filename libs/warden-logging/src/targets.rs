//! Source-component identifiers and failure markers the standard rules key on.
//!
//! Events are attributed to a component by their `tracing` target. The
//! standard rules match when the target *contains* the identifier, so
//! `warden::rate-limit` and `rate-limit` both identify the rate limiter.

/// Identifier of the rate-limiting middleware.
pub const RATE_LIMIT: &str = "rate-limit";

/// Identifier of the token-request validator subsystem.
pub const TOKEN_REQUEST_VALIDATOR: &str = "token-request-validator";

/// `tracing` target used by the rate-limiting middleware.
pub const RATE_LIMIT_TARGET: &str = "warden::rate-limit";

/// `tracing` target used by token validators.
pub const TOKEN_REQUEST_VALIDATOR_TARGET: &str = "warden::token-request-validator";

/// Failure kind recorded when a bearer token fails validation.
pub const SECURITY_TOKEN_VALIDATION: &str = "security-token-validation";

/// Exact failure message of a stale security stamp.
pub const BAD_SECURITY_STAMP: &str = "Bad security stamp.";
