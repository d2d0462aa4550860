#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Resolver Plugin
//!
//! This plugin provides static token-to-claims mapping for development and testing.
//!
//! ## Modes
//!
//! - **`static_tokens`** (default): Maps specific tokens to specific claim sets,
//!   optionally restricted to some schemes. Useful for E2E tests with distinct callers.
//!
//! - **`accept_all`**: Accepts any non-empty token and returns the configured
//!   default claims.
//!
//! In both modes a token is rejected unless its `scope` claim shares at least
//! one value with the scheme binding's allowed scopes.
//!
//! ## Configuration
//!
//! ```yaml
//! static_authn:
//!   mode: static_tokens
//!   tokens:
//!     - token: "dev-web-token"
//!       schemes: ["Bearer"]
//!       claims:
//!         amr: ["Application"]
//!         scope: ["api"]
//!         client_id: ["web"]
//!         email: ["dev@example.com"]
//! ```

pub mod config;
pub mod domain;

pub use config::StaticAuthNPluginConfig;
pub use domain::Service as StaticAuthNPlugin;
