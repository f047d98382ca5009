use axum::{extract::State, Json};
use tracing::info;
use crate::{models::DiagnosticsResponse, state::AppState};

/// Report live connection count and document size
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let snapshot = state.hub.snapshot();
    let online = state.hub.online();

    info!("Diagnostics: Conn: {}, Text: {} bytes", online, snapshot.text.len());

    Json(DiagnosticsResponse {
        online,
        text_length: snapshot.text.len(),
        last_updated: snapshot.last_updated,
    })
}
