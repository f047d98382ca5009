use serde::{Deserialize, Serialize};

/// Point-in-time copy of the shared document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DocumentSnapshot {
    pub text: String,
    pub last_updated: Option<String>,
}
