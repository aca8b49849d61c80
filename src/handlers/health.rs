use axum::Json;
use serde::Serialize;

use crate::version::GIT_VERSION;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub git_version: &'static str,
}

/// Liveness probe; needs no identity.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        git_version: GIT_VERSION,
    })
}
