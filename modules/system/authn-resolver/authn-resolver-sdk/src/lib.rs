//! `AuthN` Resolver SDK
//!
//! This crate provides the public API of the token validator consumed by the
//! API gateway:
//!
//! - [`AuthNResolverClient`] - Public API trait for consumers
//! - [`TokenValidationRequest`] - What the gateway asks the validator to check
//! - [`AuthenticationResult`] - Authentication result model
//! - [`AuthNResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::{AuthNResolverClient, TokenValidationRequest};
//!
//! let request = TokenValidationRequest {
//!     token: &token,
//!     scheme: "Bearer",
//!     authority: "https://identity.example.com/",
//!     allowed_scopes: &scopes,
//! };
//! let result = authn.authenticate(&request).await?;
//! let claims = result.claims;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AuthNResolverClient;
pub use error::AuthNResolverError;
pub use models::{AuthenticationResult, TokenValidationRequest};
