use tracing::{debug, warn};
use crate::ws::{ConnectionId, Hub};

/// Handle a ping - reply with pong to the sender only
pub fn handle_ping_message(connection_id: ConnectionId, hub: &Hub) {
    debug!("Ping message received from {}", connection_id);
    if !hub.pong(connection_id) {
        warn!("Failed to send Pong message to {}", connection_id);
    }
}
