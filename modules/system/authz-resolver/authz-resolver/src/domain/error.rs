//! Domain errors for the `AuthZ` resolver.

use authz_resolver_sdk::AuthZResolverError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("policy '{0}' is not declared")]
    UnknownPolicy(String),

    #[error("policy '{0}' is declared more than once")]
    DuplicatePolicy(String),

    #[error("policy name must not be empty")]
    EmptyPolicyName,

    #[error("policy '{policy}' has a requirement with an empty claim type")]
    EmptyClaimType { policy: String },
}

impl From<DomainError> for AuthZResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownPolicy(name) => Self::UnknownPolicy(name),
            DomainError::DuplicatePolicy(name) => Self::DuplicatePolicy(name),
            DomainError::EmptyPolicyName => Self::InvalidPolicy {
                name: String::new(),
                reason: e.to_string(),
            },
            DomainError::EmptyClaimType { ref policy } => Self::InvalidPolicy {
                name: policy.clone(),
                reason: e.to_string(),
            },
        }
    }
}
