//! Service implementation for the static `AuthN` resolver plugin.

use std::collections::HashMap;

use authn_resolver_sdk::{AuthenticationResult, TokenValidationRequest};
use secrecy::ExposeSecret;
use thiserror::Error;
use warden_security::ClaimSet;
use warden_security::constants::SCOPE;

use crate::config::{AuthNMode, StaticAuthNPluginConfig};

/// Why a token did not validate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty token")]
    EmptyToken,
    #[error("unknown token")]
    UnknownToken,
    #[error("token not valid for scheme '{0}'")]
    SchemeNotAccepted(String),
    #[error("token carries none of the allowed scopes")]
    ScopeNotAllowed,
}

#[derive(Debug, Clone)]
struct TokenEntry {
    schemes: Vec<String>,
    claims: ClaimSet,
}

impl TokenEntry {
    fn accepts_scheme(&self, scheme: &str) -> bool {
        self.schemes.is_empty() || self.schemes.iter().any(|s| s == scheme)
    }
}

/// Static `AuthN` resolver service.
///
/// Provides token-to-claims mapping based on configuration mode:
/// - `accept_all`: Any non-empty token maps to the default claims
/// - `static_tokens`: Specific tokens map to specific claims
#[derive(Debug)]
pub struct Service {
    mode: AuthNMode,
    default_claims: ClaimSet,
    token_map: HashMap<String, TokenEntry>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> Self {
        if cfg.mode == AuthNMode::AcceptAll {
            tracing::warn!("static authn plugin accepts every non-empty token");
        }

        let token_map = cfg
            .tokens
            .iter()
            .map(|m| {
                let entry = TokenEntry {
                    schemes: m.schemes.clone(),
                    claims: m.claims.clone(),
                };
                (m.token.clone(), entry)
            })
            .collect();

        Self {
            mode: cfg.mode,
            default_claims: cfg.default_claims.clone(),
            token_map,
        }
    }

    /// Validate the request's token and return the claims it maps to.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the token is empty, unknown, restricted
    /// to other schemes, or carries none of the allowed scopes.
    pub fn authenticate(
        &self,
        request: &TokenValidationRequest<'_>,
    ) -> Result<AuthenticationResult, Rejection> {
        let token = request.token.expose_secret();
        if token.is_empty() {
            return Err(Rejection::EmptyToken);
        }

        let claims = match self.mode {
            AuthNMode::AcceptAll => &self.default_claims,
            AuthNMode::StaticTokens => {
                let entry = self.token_map.get(token).ok_or(Rejection::UnknownToken)?;
                if !entry.accepts_scheme(request.scheme) {
                    return Err(Rejection::SchemeNotAccepted(request.scheme.to_owned()));
                }
                &entry.claims
            }
        };

        let scope_allowed = claims
            .values(SCOPE)
            .iter()
            .any(|scope| request.allowed_scopes.contains(scope));
        if !scope_allowed {
            return Err(Rejection::ScopeNotAllowed);
        }

        Ok(AuthenticationResult {
            claims: claims.clone(),
        })
    }
}
