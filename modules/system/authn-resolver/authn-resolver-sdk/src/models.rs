//! Domain models for the `AuthN` resolver module.

use secrecy::SecretString;
use warden_security::ClaimSet;

/// A token to validate together with the scheme binding it was resolved for.
#[derive(Debug, Clone, Copy)]
pub struct TokenValidationRequest<'a> {
    /// Raw bearer token (without the header keyword).
    pub token: &'a SecretString,
    /// Name of the scheme binding the token was resolved through.
    pub scheme: &'a str,
    /// Authority that issued the token.
    pub authority: &'a str,
    /// Scopes the binding accepts; a token must carry at least one of them.
    pub allowed_scopes: &'a [String],
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Claims asserted by the validated token.
    pub claims: ClaimSet,
}
