//! Configuration for the `AuthZ` resolver.

use authz_resolver_sdk::Policy;
use serde::{Deserialize, Serialize};

/// Configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthZResolverConfig {
    /// Register the standard policy table before the configured policies.
    pub standard_policies: bool,

    /// Additional policy declarations.
    pub policies: Vec<Policy>,
}

impl Default for AuthZResolverConfig {
    fn default() -> Self {
        Self {
            standard_policies: true,
            policies: Vec::new(),
        }
    }
}

impl AuthZResolverConfig {
    /// Every declared policy, standard ones first.
    #[must_use]
    pub fn declared_policies(&self) -> Vec<Policy> {
        let mut declared = if self.standard_policies {
            authz_resolver_sdk::policies::standard_policies()
        } else {
            Vec::new()
        };
        declared.extend(self.policies.iter().cloned());
        declared
    }
}
