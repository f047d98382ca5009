use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::SendMessage;

/// Server-assigned identity of one live connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The peer's writer has gone away.
    Closed,
    /// The peer stopped draining and its queue is full.
    Backlogged,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Closed => write!(f, "connection closed"),
            DeliveryError::Backlogged => write!(f, "outbound queue full"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Handle to one client channel: the sending half of its outbound queue.
/// Dropping the handle closes the queue, which ends the peer's writer.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
}

impl Connection {
    /// Create a connection with a bounded queue. The receiver feeds the socket writer.
    pub fn open(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id: ConnectionId::new(), tx }, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue one frame without waiting.
    pub fn deliver(&self, frame: String) -> Result<(), DeliveryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Closed(_) => DeliveryError::Closed,
            TrySendError::Full(_) => DeliveryError::Backlogged,
        })
    }
}

/// Live connections in join order. Each id appears at most once.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. Joining an id that is already present does nothing.
    pub fn join(&mut self, connection: Connection) -> bool {
        if self.contains(connection.id) {
            return false;
        }
        self.connections.push(connection);
        true
    }

    /// Unregister a connection. Returns false when it was not registered.
    pub fn leave(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        self.connections.len() != before
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.iter().any(|c| c.id == id)
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Deliver `msg` to every connection. Connections that fail to accept it
    /// are dropped from the registry. Returns the number of successful deliveries.
    pub fn broadcast(&mut self, msg: &SendMessage) -> usize {
        let Some(frame) = encode(msg) else {
            return 0;
        };
        let mut delivered = 0;
        self.connections.retain(|c| match c.deliver(frame.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(e) => {
                warn!("Dropping connection {} during {} broadcast: {}", c.id, msg.kind(), e);
                false
            }
        });
        delivered
    }

    /// Deliver `msg` to one connection, dropping it on failure.
    pub fn send_to(&mut self, id: ConnectionId, msg: &SendMessage) -> bool {
        let Some(pos) = self.connections.iter().position(|c| c.id == id) else {
            return false;
        };
        let Some(frame) = encode(msg) else {
            return false;
        };
        match self.connections[pos].deliver(frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping connection {} on {} send: {}", id, msg.kind(), e);
                self.connections.remove(pos);
                false
            }
        }
    }
}

fn encode(msg: &SendMessage) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!("Failed to serialize {} message: {}", msg.kind(), e);
            None
        }
    }
}
