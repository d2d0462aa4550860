use axum::{Extension, Json, Router, routing::get};
use serde::Serialize;
use warden_security::SecurityContext;
use warden_security::constants::SCOPE;

pub const IDENTITY_PATH: &str = "/identity";

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub scheme: String,
    pub name: Option<String>,
    pub scopes: Vec<String>,
}

/// Describe the authenticated caller.
pub async fn identity(Extension(ctx): Extension<SecurityContext>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        scheme: ctx.scheme().to_owned(),
        name: ctx.display_name().map(str::to_owned),
        scopes: ctx.claims().values(SCOPE).to_vec(),
    })
}

#[must_use]
pub fn router() -> Router {
    Router::new().route(IDENTITY_PATH, get(identity))
}
