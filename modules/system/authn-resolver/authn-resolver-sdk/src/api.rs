//! Public API trait for the `AuthN` resolver.
//!
//! The token validator is an external collaborator: the gateway extracts the
//! raw token and hands it over together with the selected scheme binding's
//! authority and allowed scopes.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::{AuthenticationResult, TokenValidationRequest};

/// Public API trait for the `AuthN` resolver.
///
/// # Security
///
/// Implementations must treat every failure to establish a claim set as an
/// error; the gateway never falls back to an authenticated principal.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// Validate a bearer token and return the claims it asserts.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is invalid, expired, malformed, or carries
    ///   none of the allowed scopes
    /// - `ServiceUnavailable` if the validator is not ready
    /// - `Internal` for unexpected errors
    async fn authenticate(
        &self,
        request: &TokenValidationRequest<'_>,
    ) -> Result<AuthenticationResult, AuthNResolverError>;
}
