use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to snapshot a document to disk.
/// `text` defaults to the current shared document.
#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct SaveRequest {
    pub text: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    pub status: String,
    pub path: String,
}
