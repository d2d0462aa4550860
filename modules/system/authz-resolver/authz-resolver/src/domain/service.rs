//! Domain service for the `AuthZ` resolver.

use std::collections::HashMap;

use authz_resolver_sdk::{DenyReason, Policy, PolicyDecision};
use warden_security::ClaimSet;

use super::error::DomainError;
use crate::config::AuthZResolverConfig;

/// Evaluate one policy against the caller's claims.
///
/// `None` and an empty claim set both stand for an anonymous caller.
/// Predicates are checked in declaration order; the first one that fails
/// names the deny reason.
#[must_use]
pub fn evaluate(policy: &Policy, claims: Option<&ClaimSet>) -> PolicyDecision {
    let claims = claims.filter(|c| !c.is_empty());

    let Some(claims) = claims else {
        if policy.require_authenticated_user {
            return PolicyDecision::Deny(DenyReason::Unauthenticated);
        }
        return match policy.requirements.first() {
            None => PolicyDecision::Allow,
            Some(predicate) => PolicyDecision::Deny(DenyReason::MissingClaim {
                claim_type: predicate.claim_type().to_owned(),
            }),
        };
    };

    match policy.requirements.iter().find(|p| !p.holds(claims)) {
        None => PolicyDecision::Allow,
        Some(failed) => PolicyDecision::Deny(DenyReason::MissingClaim {
            claim_type: failed.claim_type().to_owned(),
        }),
    }
}

/// `AuthZ` resolver service: the registry of declared policies.
#[derive(Debug)]
pub struct Service {
    policies: HashMap<String, Policy>,
}

impl Service {
    /// Register `policies`, rejecting malformed or duplicate declarations.
    ///
    /// # Errors
    ///
    /// - `DuplicatePolicy` if two policies share a name
    /// - `EmptyPolicyName` / `EmptyClaimType` for malformed declarations
    pub fn new(policies: Vec<Policy>) -> Result<Self, DomainError> {
        let mut registry = HashMap::with_capacity(policies.len());

        for policy in policies {
            if policy.name.trim().is_empty() {
                return Err(DomainError::EmptyPolicyName);
            }
            if policy
                .requirements
                .iter()
                .any(|p| p.claim_type().trim().is_empty())
            {
                return Err(DomainError::EmptyClaimType {
                    policy: policy.name,
                });
            }
            if registry.contains_key(&policy.name) {
                return Err(DomainError::DuplicatePolicy(policy.name));
            }

            tracing::debug!(
                policy = %policy.name,
                requirements = policy.requirements.len(),
                "policy registered"
            );
            registry.insert(policy.name.clone(), policy);
        }

        Ok(Self { policies: registry })
    }

    /// Build the registry from configuration.
    ///
    /// # Errors
    ///
    /// See [`Service::new`].
    pub fn from_config(cfg: &AuthZResolverConfig) -> Result<Self, DomainError> {
        Self::new(cfg.declared_policies())
    }

    #[must_use]
    pub fn policy(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Names of all registered policies, sorted.
    #[must_use]
    pub fn policy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decide the named policy for `claims`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPolicy` if `policy_name` was never registered.
    pub fn authorize(
        &self,
        policy_name: &str,
        claims: Option<&ClaimSet>,
    ) -> Result<PolicyDecision, DomainError> {
        let policy = self
            .policy(policy_name)
            .ok_or_else(|| DomainError::UnknownPolicy(policy_name.to_owned()))?;

        let decision = evaluate(policy, claims);
        if let PolicyDecision::Deny(reason) = &decision {
            tracing::debug!(policy = policy_name, ?reason, "policy denied");
        }
        Ok(decision)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authz_resolver_sdk::ClaimPredicate;
    use authz_resolver_sdk::policies::{
        APPLICATION, LICENSING, PUSH, WEB, standard_policies,
    };
    use proptest::prelude::*;
    use warden_security::constants::{AUTHENTICATION_METHOD, CLIENT_ID, SCOPE, SUBJECT};

    use super::*;

    fn service() -> Service {
        Service::new(standard_policies()).unwrap()
    }

    fn web_claims() -> ClaimSet {
        ClaimSet::new()
            .with(AUTHENTICATION_METHOD, "Application")
            .with(SCOPE, "api")
            .with(CLIENT_ID, "web")
    }

    fn missing(claim_type: &str) -> PolicyDecision {
        PolicyDecision::Deny(DenyReason::MissingClaim {
            claim_type: claim_type.to_owned(),
        })
    }

    #[test]
    fn web_client_is_allowed_by_web_and_application() {
        let svc = service();
        let claims = web_claims();

        assert_eq!(svc.authorize(WEB, Some(&claims)).unwrap(), PolicyDecision::Allow);
        assert_eq!(
            svc.authorize(APPLICATION, Some(&claims)).unwrap(),
            PolicyDecision::Allow
        );
    }

    #[test]
    fn other_client_is_denied_by_web_with_client_id() {
        let svc = service();
        let claims = ClaimSet::new()
            .with(AUTHENTICATION_METHOD, "Application")
            .with(SCOPE, "api")
            .with(CLIENT_ID, "mobile");

        assert_eq!(svc.authorize(WEB, Some(&claims)).unwrap(), missing(CLIENT_ID));
        assert_eq!(
            svc.authorize(APPLICATION, Some(&claims)).unwrap(),
            PolicyDecision::Allow
        );
    }

    #[test]
    fn scope_is_matched_among_many_values() {
        let svc = service();
        let claims = ClaimSet::new().with(SCOPE, "api").with(SCOPE, "api.push");

        assert_eq!(svc.authorize(PUSH, Some(&claims)).unwrap(), PolicyDecision::Allow);
        assert_eq!(svc.authorize(LICENSING, Some(&claims)).unwrap(), missing(SCOPE));
    }

    #[test]
    fn first_failing_predicate_names_the_reason() {
        let svc = service();
        let claims = ClaimSet::new().with(SCOPE, "api.push");

        assert_eq!(
            svc.authorize(WEB, Some(&claims)).unwrap(),
            missing(AUTHENTICATION_METHOD)
        );
    }

    #[test]
    fn anonymous_callers_are_unauthenticated() {
        let svc = service();
        let unauthenticated = PolicyDecision::Deny(DenyReason::Unauthenticated);

        for name in [APPLICATION, WEB, PUSH, LICENSING] {
            assert_eq!(svc.authorize(name, None).unwrap(), unauthenticated);
            assert_eq!(
                svc.authorize(name, Some(&ClaimSet::new())).unwrap(),
                unauthenticated
            );
        }
    }

    #[test]
    fn authenticated_policy_without_predicates_admits_any_principal() {
        let svc = Service::new(vec![Policy::new("Any")]).unwrap();
        let claims = ClaimSet::new().with(SUBJECT, "42");

        assert_eq!(svc.authorize("Any", Some(&claims)).unwrap(), PolicyDecision::Allow);
    }

    #[test]
    fn anonymous_policy() {
        let svc = Service::new(vec![
            Policy::new("Public").allow_anonymous(),
            Policy::new("Tagged")
                .allow_anonymous()
                .require(ClaimPredicate::present(SUBJECT)),
        ])
        .unwrap();

        assert_eq!(svc.authorize("Public", None).unwrap(), PolicyDecision::Allow);
        assert_eq!(svc.authorize("Tagged", None).unwrap(), missing(SUBJECT));
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let svc = service();
        assert_eq!(
            svc.authorize("Admin", Some(&web_claims())).unwrap_err(),
            DomainError::UnknownPolicy("Admin".to_owned())
        );
    }

    #[test]
    fn malformed_declarations_are_rejected() {
        assert_eq!(
            Service::new(vec![Policy::new(WEB), Policy::new(WEB)]).unwrap_err(),
            DomainError::DuplicatePolicy(WEB.to_owned())
        );
        assert_eq!(
            Service::new(vec![Policy::new(" ")]).unwrap_err(),
            DomainError::EmptyPolicyName
        );
        assert_eq!(
            Service::new(vec![Policy::new("Bad").require(ClaimPredicate::present(""))])
                .unwrap_err(),
            DomainError::EmptyClaimType {
                policy: "Bad".to_owned()
            }
        );
    }

    #[test]
    fn registry_lists_standard_names() {
        assert_eq!(
            service().policy_names(),
            [APPLICATION, LICENSING, PUSH, WEB]
        );
    }

    fn claim_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(SCOPE.to_owned()),
            Just(CLIENT_ID.to_owned()),
            Just(AUTHENTICATION_METHOD.to_owned()),
            Just(SUBJECT.to_owned()),
        ]
    }

    fn claim_value() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("api".to_owned()),
            Just("api.push".to_owned()),
            Just("web".to_owned()),
            Just("Application".to_owned()),
        ]
    }

    fn claim_sets() -> impl Strategy<Value = ClaimSet> {
        prop::collection::vec((claim_type(), claim_value()), 0..8)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    fn predicate() -> impl Strategy<Value = ClaimPredicate> {
        prop_oneof![
            (claim_type(), claim_value()).prop_map(|(t, v)| ClaimPredicate::equals(t, v)),
            claim_type().prop_map(ClaimPredicate::present),
        ]
    }

    proptest! {
        #[test]
        fn outcome_does_not_depend_on_predicate_order(
            (predicates, shuffled) in prop::collection::vec(predicate(), 0..6)
                .prop_flat_map(|predicates| {
                    (Just(predicates.clone()), Just(predicates).prop_shuffle())
                }),
            claims in claim_sets(),
        ) {
            let declared = Policy { requirements: predicates, ..Policy::new("P") };
            let permuted = Policy { requirements: shuffled, ..Policy::new("P") };

            prop_assert_eq!(
                evaluate(&declared, Some(&claims)).is_allowed(),
                evaluate(&permuted, Some(&claims)).is_allowed()
            );
        }

        #[test]
        fn evaluation_is_idempotent(claims in claim_sets()) {
            for policy in standard_policies() {
                prop_assert_eq!(evaluate(&policy, Some(&claims)), evaluate(&policy, Some(&claims)));
            }
        }

        #[test]
        fn web_allows_only_what_application_allows(claims in claim_sets()) {
            let svc = service();
            if svc.authorize(WEB, Some(&claims)).unwrap().is_allowed() {
                prop_assert!(svc.authorize(APPLICATION, Some(&claims)).unwrap().is_allowed());
            }
        }
    }
}
