use axum::Json;
use crate::models::{HealthResponse, StatusResponse};
use tracing::debug;

/// Root status endpoint
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}
