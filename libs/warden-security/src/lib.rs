#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod claims;
pub mod constants;
pub mod context;

pub use claims::ClaimSet;
pub use context::{SecurityContext, SecurityContextBuilder};
