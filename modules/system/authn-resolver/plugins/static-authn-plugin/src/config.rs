//! Configuration for the static `AuthN` resolver plugin.

use serde::{Deserialize, Serialize};
use warden_security::ClaimSet;
use warden_security::constants::{AUTHENTICATION_METHOD, CLIENT_ID, EMAIL, SCOPE, SUBJECT};

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNPluginConfig {
    /// Authentication mode.
    pub mode: AuthNMode,

    /// Claims returned in `accept_all` mode.
    pub default_claims: ClaimSet,

    /// Static token-to-claims mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticAuthNPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::StaticTokens,
            default_claims: default_claims(),
            tokens: Vec::new(),
        }
    }
}

fn default_claims() -> ClaimSet {
    ClaimSet::new()
        .with(SUBJECT, "00000000-0000-0000-0000-000000000001")
        .with(AUTHENTICATION_METHOD, "Application")
        .with(SCOPE, "api")
        .with(CLIENT_ID, "web")
        .with(EMAIL, "developer@localhost")
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token and return the default claims.
    AcceptAll,
    /// Map specific tokens to specific claim sets.
    #[default]
    StaticTokens,
}

/// Maps a static token to a claim set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    /// Schemes the token is valid for; empty means every scheme.
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Claims to return when this token is presented.
    pub claims: ClaimSet,
}
