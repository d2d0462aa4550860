//! Domain models for the `AuthZ` resolver module.

use serde::{Deserialize, Serialize};
use warden_security::ClaimSet;

/// A named, statically declared authorization policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    /// Unique policy name.
    pub name: String,

    /// Whether the caller must be authenticated before predicates apply.
    #[serde(default = "default_true")]
    pub require_authenticated_user: bool,

    /// Schemes whose principals count as authenticated for this policy.
    /// Empty means any scheme.
    #[serde(default)]
    pub authentication_schemes: Vec<String>,

    /// Predicates that must all hold, evaluated in declaration order.
    #[serde(default)]
    pub requirements: Vec<ClaimPredicate>,
}

fn default_true() -> bool {
    true
}

impl Policy {
    /// An authenticated policy without predicates.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            require_authenticated_user: true,
            authentication_schemes: Vec::new(),
            requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn allow_anonymous(mut self) -> Self {
        self.require_authenticated_user = false;
        self
    }

    #[must_use]
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authentication_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn require(mut self, predicate: ClaimPredicate) -> Self {
        self.requirements.push(predicate);
        self
    }

    /// Whether a principal authenticated through `scheme` may be evaluated
    /// with its claims under this policy.
    #[must_use]
    pub fn accepts_scheme(&self, scheme: &str) -> bool {
        self.authentication_schemes.is_empty()
            || self.authentication_schemes.iter().any(|s| s == scheme)
    }
}

/// A requirement on one claim type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ClaimPredicate {
    /// At least one value of `claim_type` equals `value`.
    Equals { claim_type: String, value: String },
    /// At least one value of `claim_type` exists.
    Present { claim_type: String },
}

impl ClaimPredicate {
    #[must_use]
    pub fn equals(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn present(claim_type: impl Into<String>) -> Self {
        Self::Present {
            claim_type: claim_type.into(),
        }
    }

    #[must_use]
    pub fn claim_type(&self) -> &str {
        match self {
            Self::Equals { claim_type, .. } | Self::Present { claim_type } => claim_type,
        }
    }

    /// Whether `claims` satisfy this predicate.
    #[must_use]
    pub fn holds(&self, claims: &ClaimSet) -> bool {
        match self {
            Self::Equals { claim_type, value } => claims.has_value(claim_type, value),
            Self::Present { claim_type } => claims.has_claim(claim_type),
        }
    }
}

/// Outcome of evaluating a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
}

impl PolicyDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Why a policy denied the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated principal.
    Unauthenticated,
    /// The first predicate that failed, identified by its claim type.
    MissingClaim { claim_type: String },
}
