use tracing::info;
use crate::models::UpdateRequest;
use crate::ws::{ConnectionId, Hub};

/// Handle UpdateRequest - replace the document and broadcast it to every connection
pub fn handle_update_message(update_msg: UpdateRequest, connection_id: ConnectionId, hub: &Hub) {
    info!("Update message received from {}: author={}, {} bytes", connection_id, update_msg.author, update_msg.text.len());
    hub.apply_update(update_msg.text, update_msg.author);
}
