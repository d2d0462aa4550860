#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Resolver SDK
//!
//! This crate provides the public API for the `authz_resolver` module:
//!
//! - [`AuthZResolverClient`] - Public API trait for consumers
//! - [`Policy`], [`ClaimPredicate`] - Policy declarations
//! - [`PolicyDecision`], [`DenyReason`] - Evaluation outcome
//! - [`policies`] - The standard policy table
//! - [`AuthZResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{AuthZResolverClient, PolicyDecision, policies};
//!
//! match authz.authorize(policies::WEB, Some(ctx.claims()))? {
//!     PolicyDecision::Allow => { /* serve */ }
//!     PolicyDecision::Deny(reason) => { /* 401 or 403 */ }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod policies;

// Re-export main types at crate root
pub use api::AuthZResolverClient;
pub use error::AuthZResolverError;
pub use models::{ClaimPredicate, DenyReason, Policy, PolicyDecision};
