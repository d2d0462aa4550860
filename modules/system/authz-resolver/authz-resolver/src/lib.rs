//! `AuthZ` Resolver Module
//!
//! Holds the declared policies and decides allow/deny for a named policy
//! over a validated claim set. Policies are registered once at startup and
//! evaluated without locking.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::AuthZResolverConfig;
pub use domain::{AuthZResolverLocalClient, DomainError, Service};
