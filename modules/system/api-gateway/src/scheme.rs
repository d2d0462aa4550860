//! Bearer scheme bindings and the token scheme resolver.
//!
//! A binding says where a scheme's token travels: after a keyword in the
//! `Authorization` header, or in a scheme-specific query parameter. The
//! resolver tries bindings in declaration order, header before query, and
//! selects the first one that yields a non-empty token.

use std::collections::HashSet;

use http::{HeaderMap, Request, Uri, header};
use secrecy::SecretString;
use url::Url;

use crate::config::{ApiGatewayConfig, AuthConfig, SchemeBindingConfig};
use crate::error::GatewayError;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// How a request reached the gateway.
///
/// A TLS acceptor may insert this into request extensions; it then takes
/// precedence over everything derived from the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plaintext,
    Tls,
}

impl Transport {
    fn from_scheme(scheme: &str) -> Self {
        if scheme.eq_ignore_ascii_case("https") {
            Self::Tls
        } else {
            Self::Plaintext
        }
    }

    /// Detect the transport of `req`.
    ///
    /// Order: `Transport` extension, URI scheme, then the first
    /// `X-Forwarded-Proto` value when `trust_forwarded_proto` is set.
    #[must_use]
    pub fn detect<B>(req: &Request<B>, trust_forwarded_proto: bool) -> Self {
        if let Some(transport) = req.extensions().get::<Self>() {
            return *transport;
        }
        if let Some(scheme) = req.uri().scheme_str() {
            return Self::from_scheme(scheme);
        }
        if trust_forwarded_proto && let Some(proto) = forwarded_proto(req.headers()) {
            return Self::from_scheme(proto);
        }
        Self::Plaintext
    }
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(X_FORWARDED_PROTO)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
}

/// A configured bearer scheme, validated at startup.
#[derive(Debug, Clone)]
pub struct SchemeBinding {
    name: String,
    header_scheme: String,
    query_parameter: String,
    authority: Url,
    allowed_scopes: Vec<String>,
    name_claim_type: String,
    require_https_metadata: bool,
}

fn invalid(cfg: &SchemeBindingConfig, reason: impl Into<String>) -> GatewayError {
    GatewayError::InvalidBinding {
        scheme: cfg.name.clone(),
        reason: reason.into(),
    }
}

impl SchemeBinding {
    /// Validate a binding declaration.
    ///
    /// HTTPS token transport is required unless running in development or
    /// the authority itself is plain `http`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBinding` for empty fields, a malformed authority or
    /// an empty scope list.
    pub fn from_config(cfg: &SchemeBindingConfig, auth: &AuthConfig) -> Result<Self, GatewayError> {
        if cfg.name.trim().is_empty() {
            return Err(invalid(cfg, "name must not be empty"));
        }
        let header_scheme = cfg.header_scheme();
        if header_scheme.is_empty() || header_scheme.contains(char::is_whitespace) {
            return Err(invalid(cfg, "header keyword must be a single non-empty word"));
        }
        if cfg.query_parameter.trim().is_empty() {
            return Err(invalid(cfg, "query parameter must not be empty"));
        }
        if cfg.name_claim_type.trim().is_empty() {
            return Err(invalid(cfg, "name claim type must not be empty"));
        }
        if cfg.allowed_scopes.is_empty() || cfg.allowed_scopes.iter().any(String::is_empty) {
            return Err(invalid(cfg, "at least one non-empty allowed scope is required"));
        }

        let raw_authority = cfg.authority.as_deref().unwrap_or(&auth.authority);
        let authority = Url::parse(raw_authority)
            .map_err(|e| invalid(cfg, format!("authority '{raw_authority}': {e}")))?;
        if !matches!(authority.scheme(), "http" | "https") || authority.host().is_none() {
            return Err(invalid(
                cfg,
                format!("authority '{raw_authority}' must be an absolute http(s) URL"),
            ));
        }

        let require_https_metadata = !auth.development && authority.scheme() == "https";

        Ok(Self {
            name: cfg.name.clone(),
            header_scheme: header_scheme.to_owned(),
            query_parameter: cfg.query_parameter.clone(),
            authority,
            allowed_scopes: cfg.allowed_scopes.clone(),
            name_claim_type: cfg.name_claim_type.clone(),
            require_https_metadata,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn header_scheme(&self) -> &str {
        &self.header_scheme
    }

    #[must_use]
    pub fn query_parameter(&self) -> &str {
        &self.query_parameter
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }

    #[must_use]
    pub fn allowed_scopes(&self) -> &[String] {
        &self.allowed_scopes
    }

    #[must_use]
    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    #[must_use]
    pub fn require_https_metadata(&self) -> bool {
        self.require_https_metadata
    }

    fn token_from_header<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (keyword, token) = value.trim().split_once(' ')?;
        if !keyword.eq_ignore_ascii_case(&self.header_scheme) {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    fn token_from_query(&self, uri: &Uri) -> Option<String> {
        let query = uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == self.query_parameter.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    fn extract(&self, headers: &HeaderMap, uri: &Uri) -> Option<String> {
        self.token_from_header(headers)
            .map(str::to_owned)
            .or_else(|| self.token_from_query(uri))
    }
}

/// A raw token together with the binding it was found through.
#[derive(Debug)]
pub struct ResolvedToken<'a> {
    binding: &'a SchemeBinding,
    token: SecretString,
}

impl<'a> ResolvedToken<'a> {
    #[must_use]
    pub fn binding(&self) -> &'a SchemeBinding {
        self.binding
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

/// Picks the bearer scheme of a request and extracts its raw token.
#[derive(Debug, Clone)]
pub struct TokenSchemeResolver {
    bindings: Vec<SchemeBinding>,
    trust_forwarded_proto: bool,
}

impl TokenSchemeResolver {
    /// # Errors
    ///
    /// Returns an error when no binding is given or scheme names or query
    /// parameters repeat.
    pub fn new(
        bindings: Vec<SchemeBinding>,
        trust_forwarded_proto: bool,
    ) -> Result<Self, GatewayError> {
        if bindings.is_empty() {
            return Err(GatewayError::NoSchemes);
        }

        let mut names = HashSet::new();
        let mut parameters = HashSet::new();
        for binding in &bindings {
            if !names.insert(binding.name.as_str()) {
                return Err(GatewayError::DuplicateScheme(binding.name.clone()));
            }
            if !parameters.insert(binding.query_parameter.as_str()) {
                return Err(GatewayError::DuplicateQueryParameter(
                    binding.query_parameter.clone(),
                ));
            }
        }

        Ok(Self {
            bindings,
            trust_forwarded_proto,
        })
    }

    /// Build and validate every configured binding.
    ///
    /// # Errors
    ///
    /// See [`SchemeBinding::from_config`] and [`TokenSchemeResolver::new`].
    pub fn from_config(cfg: &ApiGatewayConfig) -> Result<Self, GatewayError> {
        let bindings = cfg
            .auth
            .schemes
            .iter()
            .map(|scheme| SchemeBinding::from_config(scheme, &cfg.auth))
            .collect::<Result<Vec<_>, _>>()?;

        for binding in &bindings {
            tracing::info!(
                scheme = binding.name(),
                header = binding.header_scheme(),
                query_parameter = binding.query_parameter(),
                authority = binding.authority(),
                require_https = binding.require_https_metadata(),
                "bearer scheme bound"
            );
        }

        Self::new(bindings, cfg.trust_forwarded_proto)
    }

    #[must_use]
    pub fn bindings(&self) -> &[SchemeBinding] {
        &self.bindings
    }

    /// Resolve the request's bearer token.
    ///
    /// Returns `None` when no binding yields a token, and also when the
    /// selected binding requires HTTPS but the request arrived in plaintext.
    #[must_use]
    pub fn resolve<B>(&self, req: &Request<B>) -> Option<ResolvedToken<'_>> {
        let (binding, token) = self
            .bindings
            .iter()
            .find_map(|b| b.extract(req.headers(), req.uri()).map(|token| (b, token)))?;

        if binding.require_https_metadata
            && Transport::detect(req, self.trust_forwarded_proto) != Transport::Tls
        {
            tracing::debug!(
                scheme = binding.name(),
                "ignoring bearer token sent over plaintext"
            );
            return None;
        }

        Some(ResolvedToken {
            binding,
            token: SecretString::from(token),
        })
    }
}
