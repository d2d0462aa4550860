//! Public API trait for the `AuthZ` resolver.

use warden_security::ClaimSet;

use crate::error::AuthZResolverError;
use crate::models::{Policy, PolicyDecision};

/// Public API trait for the `AuthZ` resolver.
///
/// Evaluation is a pure function of the declared policy and the claim set,
/// so the trait is synchronous and implementations are shared across
/// requests without locking:
///
/// ```ignore
/// let decision = authz.authorize("Web", Some(ctx.claims()))?;
/// ```
pub trait AuthZResolverClient: Send + Sync {
    /// Decide whether `claims` satisfy the named policy.
    ///
    /// `None` stands for an anonymous caller.
    ///
    /// # Errors
    ///
    /// - `UnknownPolicy` if no policy with that name is declared; this is a
    ///   configuration error and never turns into a deny
    fn authorize(
        &self,
        policy_name: &str,
        claims: Option<&ClaimSet>,
    ) -> Result<PolicyDecision, AuthZResolverError>;

    /// Look up a declared policy by name.
    fn policy(&self, policy_name: &str) -> Option<&Policy>;
}
