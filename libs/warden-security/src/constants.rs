//! Well-known claim types asserted by the identity authority.

/// Authentication method reference (`amr`).
pub const AUTHENTICATION_METHOD: &str = "amr";

/// Granted scopes. Multi-valued.
pub const SCOPE: &str = "scope";

/// OAuth client the token was issued to.
pub const CLIENT_ID: &str = "client_id";

/// Subject identifier.
pub const SUBJECT: &str = "sub";

/// E-mail address of the subject; used as the display identity.
pub const EMAIL: &str = "email";

/// Name of the current bearer scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// Name of the legacy bearer scheme kept for older clients.
pub const LEGACY_BEARER_SCHEME: &str = "Bearer3";
