use crate::claims::ClaimSet;

/// `SecurityContext` encapsulates the authenticated principal of a request.
///
/// Built by the API gateway after the `AuthN` Resolver validated a bearer token
/// and inserted into request extensions. Policy evaluation reads the claims;
/// handlers read the display name and scheme.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    /// Authentication scheme that produced the principal (e.g. `Bearer`, `Bearer3`).
    scheme: String,
    /// Claims asserted by the validated token.
    #[serde(default)]
    claims: ClaimSet,
    /// Display identity, read from the scheme's name claim type.
    display_name: Option<String>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Name of the scheme the principal authenticated through.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    scheme: Option<String>,
    claims: ClaimSet,
    name_claim_type: Option<String>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = Some(scheme.to_owned());
        self
    }

    #[must_use]
    pub fn claims(mut self, claims: ClaimSet) -> Self {
        self.claims = claims;
        self
    }

    /// Claim type whose first value becomes the display name.
    #[must_use]
    pub fn name_claim_type(mut self, claim_type: &str) -> Self {
        self.name_claim_type = Some(claim_type.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        let display_name = self
            .name_claim_type
            .as_deref()
            .and_then(|t| self.claims.first(t))
            .map(str::to_owned);

        SecurityContext {
            scheme: self.scheme.unwrap_or_default(),
            claims: self.claims,
            display_name,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::constants::{EMAIL, SCOPE};

    #[test]
    fn builder_full() {
        let claims = ClaimSet::new()
            .with(SCOPE, "api")
            .with(EMAIL, "alice@example.com");

        let ctx = SecurityContext::builder()
            .scheme("Bearer")
            .claims(claims)
            .name_claim_type(EMAIL)
            .build();

        assert_eq!(ctx.scheme(), "Bearer");
        assert!(ctx.claims().has_value(SCOPE, "api"));
        assert_eq!(ctx.display_name(), Some("alice@example.com"));
    }

    #[test]
    fn builder_minimal() {
        let ctx = SecurityContext::builder().build();

        assert_eq!(ctx.scheme(), "");
        assert!(ctx.claims().is_empty());
        assert!(ctx.display_name().is_none());
    }

    #[test]
    fn display_name_absent_when_claim_missing() {
        let ctx = SecurityContext::builder()
            .claims(ClaimSet::new().with(SCOPE, "api"))
            .name_claim_type(EMAIL)
            .build();

        assert!(ctx.display_name().is_none());
    }

    #[test]
    fn serde_roundtrip_keeps_claims() {
        let ctx = SecurityContext::builder()
            .scheme("Bearer3")
            .claims(ClaimSet::new().with(SCOPE, "api.push"))
            .name_claim_type(EMAIL)
            .build();

        let serialized = serde_json::to_string(&ctx).unwrap();
        let restored: SecurityContext = serde_json::from_str(&serialized).unwrap();
        assert_eq!(restored.scheme(), "Bearer3");
        assert!(restored.claims().has_value(SCOPE, "api.push"));
    }
}
