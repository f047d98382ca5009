use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tracing::{info, debug};
use futures_util::{StreamExt, SinkExt};

use crate::state::AppState;
use crate::models::ReceivedMessage;
use crate::websocket::msg_update_handler::handle_update_message;
use crate::websocket::msg_meta_handler::handle_meta_message;
use crate::websocket::msg_ping_handler::handle_ping_message;
use crate::websocket::session::Session;
use crate::ws::{ConnectionId, Hub};


/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    debug!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state.hub))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<Hub>) {

    let mut session = Session::new(hub.clone());
    let Some((connection_id, mut outbound)) = session.activate() else {
        return;
    };
    info!("WebSocket connection established with connection_id: {}", connection_id);

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Drain this connection's queue into the socket. The queue closes when the
    // hub evicts the connection.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(frame)).await {
                debug!("Send to {} failed: {}", connection_id, e);
                return;
            }
        }
        debug!("Outbound queue for {} closed, closing socket", connection_id);
        let _ = sender.send(Message::Close(None)).await;
    });

    // Process inbound frames in receipt order
    let reader_hub = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(frame)) => handle_text_frame(&reader_hub, connection_id, &frame),
                Ok(Message::Close(_)) => break,
                Ok(Message::Binary(_)) => debug!("Ignoring binary frame from {}", connection_id),
                Ok(_) => {}
                Err(e) => {
                    debug!("Receive from {} failed: {}", connection_id, e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    session.close();
    info!("WebSocket connection {} terminated", connection_id);
}

/// Interpret one text frame. Malformed frames and unknown kinds are ignored,
/// as is anything from a connection the hub has already evicted.
pub fn handle_text_frame(hub: &Hub, connection_id: ConnectionId, frame: &str) {
    if !hub.is_connected(connection_id) {
        debug!("Ignoring frame from evicted connection {}", connection_id);
        return;
    }

    let msg = match ReceivedMessage::parse(frame) {
        Ok(msg) => msg,
        Err(e) => {
            debug!("Ignoring malformed message from {}: {}", connection_id, e);
            return;
        }
    };

    match msg {
        ReceivedMessage::Update(update_msg) => handle_update_message(update_msg, connection_id, hub),
        ReceivedMessage::Meta(payload) => handle_meta_message(payload, connection_id, hub),
        ReceivedMessage::Ping => handle_ping_message(connection_id, hub),
        ReceivedMessage::Unknown(kind) => {
            debug!("Ignoring message of unknown type {:?} from {}", kind, connection_id);
        }
    }
}
