#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! API Gateway
//!
//! Resolves the bearer scheme of each request, validates the token through
//! the `AuthN` resolver, enforces route-group policies through the `AuthZ`
//! resolver and throttles clients when not self-hosted.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod problem;
pub mod scheme;
pub mod web;

pub use config::ApiGatewayConfig;
pub use error::GatewayError;
pub use gateway::ApiGateway;
pub use problem::Problem;
pub use scheme::{ResolvedToken, SchemeBinding, TokenSchemeResolver, Transport};
