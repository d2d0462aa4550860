//! Local (in-process) client for the `AuthZ` resolver.

use std::sync::Arc;

use authz_resolver_sdk::{AuthZResolverClient, AuthZResolverError, Policy, PolicyDecision};
use warden_security::ClaimSet;

use super::{DomainError, Service};

/// Local client wrapping the service.
#[derive(Debug, Clone)]
pub struct AuthZResolverLocalClient {
    svc: Arc<Service>,
}

impl AuthZResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AuthZResolverError {
    tracing::error!(operation = op, error = %e, "authz_resolver call failed");
    e.into()
}

impl AuthZResolverClient for AuthZResolverLocalClient {
    fn authorize(
        &self,
        policy_name: &str,
        claims: Option<&ClaimSet>,
    ) -> Result<PolicyDecision, AuthZResolverError> {
        self.svc
            .authorize(policy_name, claims)
            .map_err(|e| log_and_convert("authorize", e))
    }

    fn policy(&self, policy_name: &str) -> Option<&Policy> {
        self.svc.policy(policy_name)
    }
}
