use crate::{SERVICE_NAME, ServerConfig};
use axum::{Json, extract::State};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthController {
    config: ServerConfig,
}

impl HealthController {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub ok: bool,
    pub ready: bool,
    pub generation_configured: bool,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true, service: SERVICE_NAME, version: env!("CARGO_PKG_VERSION") })
}

/// The service accepts traffic without a model; generation requests then fail with 503.
pub async fn ready(State(controller): State<HealthController>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ok: true,
        ready: true,
        generation_configured: controller.config.pipeline.is_generation_configured(),
    })
}
