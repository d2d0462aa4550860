//! Client implementation for the static `AuthN` resolver plugin.
//!
//! Implements `AuthNResolverClient` using the domain service. Rejections are
//! logged the way a token validator reports them; the diagnostic filter
//! decides which of those reach the output.

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverClient, AuthNResolverError, AuthenticationResult, TokenValidationRequest,
};
use warden_logging::targets::{SECURITY_TOKEN_VALIDATION, TOKEN_REQUEST_VALIDATOR_TARGET};

use super::service::{Rejection, Service};

fn log_rejection(rejection: &Rejection, scheme: &str) {
    match rejection {
        Rejection::ScopeNotAllowed => {
            tracing::error!(
                target: TOKEN_REQUEST_VALIDATOR_TARGET,
                scheme,
                "token request rejected: {rejection}"
            );
        }
        Rejection::EmptyToken | Rejection::UnknownToken | Rejection::SchemeNotAccepted(_) => {
            tracing::error!(
                error.kind = SECURITY_TOKEN_VALIDATION,
                error.message = %rejection,
                scheme,
                "bearer token validation failed"
            );
        }
    }
}

#[async_trait]
impl AuthNResolverClient for Service {
    async fn authenticate(
        &self,
        request: &TokenValidationRequest<'_>,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        Service::authenticate(self, request).map_err(|rejection| {
            log_rejection(&rejection, request.scheme);
            AuthNResolverError::Unauthorized(rejection.to_string())
        })
    }
}
