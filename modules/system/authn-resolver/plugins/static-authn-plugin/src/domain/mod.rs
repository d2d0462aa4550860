//! Domain layer for the static `AuthN` resolver plugin.

pub mod client;
pub mod service;

pub use service::{Rejection, Service};
