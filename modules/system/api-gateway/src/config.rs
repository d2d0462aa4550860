use serde::{Deserialize, Serialize};
use warden_security::constants::{BEARER_SCHEME, EMAIL, LEGACY_BEARER_SCHEME};

/// API gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiGatewayConfig {
    pub bind_addr: String,

    /// Self-hosted installations run without request throttling.
    pub self_hosted: bool,

    /// Honor `X-Forwarded-Proto` when deciding whether a request arrived over TLS.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_proto: bool,

    /// Key rate limits by the first `X-Forwarded-For` hop instead of the peer
    /// address. Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,

    /// Per-client rate limit, applied when not self-hosted.
    pub rate_limit: RateLimitConfig,

    pub auth: AuthConfig,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            self_hosted: false,
            trust_forwarded_proto: false,
            trust_forwarded_for: false,
            rate_limit: RateLimitConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RateLimitConfig {
    /// Sustained requests per second per client address.
    pub rps: u32,
    /// Requests a client may send in a burst above `rps`.
    pub burst: u32,
    /// Seconds between sweeps that forget idle clients.
    pub prune_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rps: 50,
            burst: 100,
            prune_interval_secs: 60,
        }
    }
}

/// Bearer scheme configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    /// Identity authority that issues access tokens.
    pub authority: String,

    /// Development mode never requires HTTPS token transport.
    pub development: bool,

    /// Scheme bindings, tried in declaration order.
    pub schemes: Vec<SchemeBindingConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authority: "http://localhost:33656/".to_owned(),
            development: false,
            schemes: vec![
                SchemeBindingConfig::new(BEARER_SCHEME, "access_token"),
                SchemeBindingConfig::new(LEGACY_BEARER_SCHEME, "access_token3"),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeBindingConfig {
    /// Scheme name recorded on the principal.
    pub name: String,

    /// Keyword in the `Authorization` header; defaults to the scheme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_scheme: Option<String>,

    /// Query parameter carrying the token.
    pub query_parameter: String,

    /// Overrides [`AuthConfig::authority`] for this scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    #[serde(default = "default_allowed_scopes")]
    pub allowed_scopes: Vec<String>,

    /// Claim type whose value becomes the principal's display name.
    #[serde(default = "default_name_claim_type")]
    pub name_claim_type: String,
}

impl SchemeBindingConfig {
    #[must_use]
    pub fn new(name: &str, query_parameter: &str) -> Self {
        Self {
            name: name.to_owned(),
            header_scheme: None,
            query_parameter: query_parameter.to_owned(),
            authority: None,
            allowed_scopes: default_allowed_scopes(),
            name_claim_type: default_name_claim_type(),
        }
    }

    #[must_use]
    pub fn header_scheme(&self) -> &str {
        self.header_scheme.as_deref().unwrap_or(&self.name)
    }
}

fn default_allowed_scopes() -> Vec<String> {
    vec![
        "api".to_owned(),
        "api.push".to_owned(),
        "api.licensing".to_owned(),
    ]
}

fn default_name_claim_type() -> String {
    EMAIL.to_owned()
}
