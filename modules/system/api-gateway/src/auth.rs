use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};

use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, TokenValidationRequest};
use authz_resolver_sdk::{AuthZResolverClient, DenyReason, PolicyDecision};
use warden_security::SecurityContext;

use crate::problem::Problem;
use crate::scheme::TokenSchemeResolver;

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub authn_client: Arc<dyn AuthNResolverClient>,
    pub resolver: Arc<TokenSchemeResolver>,
}

/// Authentication middleware that validates the request's bearer token.
///
/// For each request:
/// 1. Resolves the bearer scheme and raw token via [`TokenSchemeResolver`]
/// 2. Calls the `AuthN` Resolver with the binding's authority and allowed scopes
/// 3. On success inserts a [`SecurityContext`] into request extensions
///
/// A missing or rejected token leaves the request anonymous; route policies
/// decide whether that is acceptable. Validator outages fail the request.
pub async fn authn_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(resolved) = state.resolver.resolve(&req) else {
        return next.run(req).await;
    };

    let binding = resolved.binding();
    let validation = TokenValidationRequest {
        token: resolved.token(),
        scheme: binding.name(),
        authority: binding.authority(),
        allowed_scopes: binding.allowed_scopes(),
    };

    match state.authn_client.authenticate(&validation).await {
        Ok(result) => {
            let ctx = SecurityContext::builder()
                .scheme(binding.name())
                .claims(result.claims)
                .name_claim_type(binding.name_claim_type())
                .build();
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(AuthNResolverError::Unauthorized(msg)) => {
            tracing::debug!(scheme = binding.name(), "AuthN rejected: {msg}");
            next.run(req).await
        }
        Err(err) => authn_error_to_response(&err),
    }
}

/// Convert validator failures to an RFC-9457 Problem Details response.
fn authn_error_to_response(err: &AuthNResolverError) -> Response {
    log_authn_error(err);
    let (status, title, detail) = match err {
        AuthNResolverError::ServiceUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            "Authentication service unavailable",
        ),
        AuthNResolverError::Unauthorized(_) | AuthNResolverError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Internal authentication error",
        ),
    };
    Problem::new(status, title, detail).into_response()
}

fn log_authn_error(err: &AuthNResolverError) {
    match err {
        AuthNResolverError::ServiceUnavailable(msg) => {
            tracing::error!("AuthN service unavailable: {msg}");
        }
        AuthNResolverError::Unauthorized(msg) | AuthNResolverError::Internal(msg) => {
            tracing::error!("AuthN internal error: {msg}");
        }
    }
}

/// Shared state for the policy middleware of one route group.
#[derive(Clone)]
pub struct PolicyState {
    pub authz_client: Arc<dyn AuthZResolverClient>,
    pub policy: Arc<str>,
}

/// Enforces a named policy on every request of a route group.
///
/// The principal's claims only count when the policy accepts the scheme it
/// authenticated through. Responses never name the failing claim.
pub async fn policy_middleware(
    State(state): State<PolicyState>,
    req: Request,
    next: Next,
) -> Response {
    let decision = {
        let claims = req.extensions().get::<SecurityContext>().and_then(|ctx| {
            state
                .authz_client
                .policy(&state.policy)
                .filter(|policy| policy.accepts_scheme(ctx.scheme()))
                .map(|_| ctx.claims())
        });
        state.authz_client.authorize(&state.policy, claims)
    };

    match decision {
        Ok(PolicyDecision::Allow) => next.run(req).await,
        Ok(PolicyDecision::Deny(DenyReason::Unauthenticated)) => unauthenticated(),
        Ok(PolicyDecision::Deny(DenyReason::MissingClaim { claim_type })) => {
            tracing::debug!(
                policy = %state.policy,
                claim_type = %claim_type,
                "request denied by policy"
            );
            Problem::forbidden().into_response()
        }
        Err(err) => {
            tracing::error!(policy = %state.policy, error = %err, "policy evaluation failed");
            Problem::internal().into_response()
        }
    }
}

fn unauthenticated() -> Response {
    let mut response = Problem::unauthorized().into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
