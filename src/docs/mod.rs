use utoipa::OpenApi;
use crate::models::*;

/// Server status
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is running", body = StatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn status_doc() {}

/// Save a document snapshot to disk
#[utoipa::path(
    post,
    path = "/save",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Snapshot written", body = SaveResponse),
        (status = 500, description = "Snapshot could not be written", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn save_document_doc() {}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Live connection and document statistics
#[utoipa::path(
    get,
    path = "/api/diagnostics",
    responses(
        (status = 200, description = "Current diagnostics", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        status_doc,
        save_document_doc,
        health_check_doc,
        diagnostics_doc,
    ),
    components(
        schemas(StatusResponse, SaveRequest, SaveResponse, HealthResponse, DiagnosticsResponse, ErrorResponse)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
