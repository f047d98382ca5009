use std::path::Path;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::{error, info};
use crate::{models::{ErrorResponse, SaveRequest, SaveResponse}, state::AppState};

/// Snapshot a document to a timestamped text file in the save directory
pub async fn save_document(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<(StatusCode, Json<SaveResponse>), (StatusCode, Json<ErrorResponse>)> {

    let text = match req.text {
        Some(text) => text,
        None => state.hub.snapshot().text,
    };
    let name = sanitize_name(req.name.as_deref().unwrap_or("document"));
    let filename = format!("saved_{}_{}.txt", name, Utc::now().format("%Y%m%d_%H%M%S"));

    let dir = Path::new(&state.config.save_dir);
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        error!("Failed to create save directory '{}': {}", dir.display(), e);
        return Err(ErrorResponse::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create save directory: {}", e),
        ));
    }

    let path = dir.join(filename);
    if let Err(e) = tokio::fs::write(&path, text.as_bytes()).await {
        error!("Failed to write snapshot '{}': {}", path.display(), e);
        return Err(ErrorResponse::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to write snapshot: {}", e),
        ));
    }

    info!("Saved {} bytes to {}", text.len(), path.display());
    Ok((StatusCode::OK, Json(SaveResponse {
        status: "ok".to_string(),
        path: path.display().to_string(),
    })))
}

/// Keep only characters that are safe inside a single file name
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
