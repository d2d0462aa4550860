use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `ClaimSet` is the bag of claims established for an authenticated principal.
///
/// Produced by the `AuthN` Resolver once a bearer token validates and handed
/// unchanged to policy evaluation. Claim types compare case-insensitively
/// (ASCII); claim values compare exactly. A claim type may carry several
/// values (e.g. `scope`), and no ordering is implied among them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct ClaimSet {
    claims: BTreeMap<String, Vec<String>>,
}

fn normalize(claim_type: &str) -> String {
    claim_type.to_ascii_lowercase()
}

impl ClaimSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim value. Repeated values for the same type are stored once.
    pub fn insert(&mut self, claim_type: &str, value: impl Into<String>) {
        let value = value.into();
        let values = self.claims.entry(normalize(claim_type)).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Chaining variant of [`ClaimSet::insert`].
    #[must_use]
    pub fn with(mut self, claim_type: &str, value: impl Into<String>) -> Self {
        self.insert(claim_type, value);
        self
    }

    /// All values asserted for `claim_type`; empty when the claim is absent.
    #[must_use]
    pub fn values(&self, claim_type: &str) -> &[String] {
        self.claims
            .get(&normalize(claim_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First value of `claim_type`, if any.
    #[must_use]
    pub fn first(&self, claim_type: &str) -> Option<&str> {
        self.values(claim_type).first().map(String::as_str)
    }

    /// Whether at least one value of `claim_type` exists.
    #[must_use]
    pub fn has_claim(&self, claim_type: &str) -> bool {
        !self.values(claim_type).is_empty()
    }

    /// Whether `claim_type` carries exactly `value` among its values.
    #[must_use]
    pub fn has_value(&self, claim_type: &str, value: &str) -> bool {
        self.values(claim_type).iter().any(|v| v == value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.values().all(Vec::is_empty)
    }

    /// Number of distinct claim types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.values().filter(|v| !v.is_empty()).count()
    }

    /// Iterate over `(claim_type, values)` pairs; claim types are lowercase.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.claims
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for ClaimSet
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (claim_type, value) in iter {
            set.insert(claim_type.as_ref(), value);
        }
        set
    }
}

impl From<BTreeMap<String, Vec<String>>> for ClaimSet {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        raw.into_iter()
            .flat_map(|(claim_type, values)| {
                values.into_iter().map(move |v| (claim_type.clone(), v))
            })
            .collect()
    }
}

impl From<ClaimSet> for BTreeMap<String, Vec<String>> {
    fn from(set: ClaimSet) -> Self {
        set.claims
    }
}
