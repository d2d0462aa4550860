use axum::{Json, Router, routing::get};
use serde::Serialize;

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Routes open to every caller.
#[must_use]
pub fn public_router() -> Router {
    Router::new().route(HEALTH_PATH, get(health))
}
