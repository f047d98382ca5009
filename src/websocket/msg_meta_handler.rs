use serde_json::Value;
use tracing::debug;
use crate::ws::{ConnectionId, Hub};

/// Handle a meta message - relayed untouched, nothing is stored
pub fn handle_meta_message(payload: Value, connection_id: ConnectionId, hub: &Hub) {
    debug!("Meta message received from {}", connection_id);
    hub.relay_meta(payload);
}
