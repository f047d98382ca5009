use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{DocumentSnapshot, InitMessage, SendMessage, UpdateMessage};
use crate::ws::document::DocumentCell;
use crate::ws::registry::{Connection, ConnectionId, ConnectionRegistry};

/// Shared state of the collaboration server: the document and the live connections.
///
/// Lock order is document before registry. Neither lock is held across an await.
#[derive(Debug)]
pub struct Hub {
    document: Mutex<DocumentCell>,
    registry: Mutex<ConnectionRegistry>,
    queue_capacity: usize,
}

/// A joiner receives `init` and its own `presence` before anything drains its queue.
pub const MIN_QUEUE_CAPACITY: usize = 2;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Hub {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            document: Mutex::new(DocumentCell::new()),
            registry: Mutex::new(ConnectionRegistry::new()),
            queue_capacity: queue_capacity.max(MIN_QUEUE_CAPACITY),
        }
    }

    /// Register a new connection, queue its `init` and announce the new presence
    /// to everyone. Returns the id and the receiving end of its outbound queue.
    pub fn connect(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let (conn, rx) = Connection::open(self.queue_capacity);
        let id = conn.id();

        // The document lock keeps updates out until the joiner is registered,
        // so its snapshot is followed by exactly the updates applied after it.
        let doc = lock(&self.document);
        let snapshot = doc.snapshot();
        let mut registry = lock(&self.registry);
        registry.join(conn);
        let online = registry.size();
        let init = SendMessage::Init(InitMessage {
            text: snapshot.text,
            last_updated: snapshot.last_updated,
            online,
        });
        registry.send_to(id, &init);
        registry.broadcast(&SendMessage::presence(online));
        info!("Connection {} joined, {} online", id, registry.size());

        (id, rx)
    }

    /// Unregister a connection and announce the new presence to the rest.
    pub fn disconnect(&self, id: ConnectionId) {
        let mut registry = lock(&self.registry);
        if !registry.leave(id) {
            debug!("Connection {} was already gone from the registry", id);
        }
        let online = registry.size();
        registry.broadcast(&SendMessage::presence(online));
        info!("Connection {} left, {} online", id, registry.size());
    }

    /// Replace the document and broadcast the new state. Returns the new stamp.
    pub fn apply_update(&self, text: String, author: Value) -> String {
        let mut doc = lock(&self.document);
        let last_updated = doc.set_text(text);
        let msg = SendMessage::Update(UpdateMessage {
            text: doc.text().to_string(),
            last_updated: last_updated.clone(),
            author,
        });
        let delivered = lock(&self.registry).broadcast(&msg);
        debug!("Update ({} bytes) delivered to {} connections", doc.text().len(), delivered);
        last_updated
    }

    /// Relay an opaque meta payload to every connection.
    pub fn relay_meta(&self, payload: Value) {
        lock(&self.registry).broadcast(&SendMessage::Meta(payload));
    }

    /// Answer a ping from `id`, and only `id`.
    pub fn pong(&self, id: ConnectionId) -> bool {
        lock(&self.registry).send_to(id, &SendMessage::Pong)
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        lock(&self.document).snapshot()
    }

    pub fn online(&self) -> usize {
        lock(&self.registry).size()
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        lock(&self.registry).contains(id)
    }
}
