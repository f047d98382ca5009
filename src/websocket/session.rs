use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::ws::{ConnectionId, Hub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

/// Lifecycle of one client connection.
///
/// The close transition runs exactly once: either through [`Session::close`]
/// or, on any other exit path, when the session is dropped.
pub struct Session {
    hub: Arc<Hub>,
    id: Option<ConnectionId>,
    state: SessionState,
}

impl Session {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub, id: None, state: SessionState::Connecting }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Join the hub. Only valid from `Connecting`; the returned queue carries
    /// the `init` frame followed by every broadcast addressed to this session.
    pub fn activate(&mut self) -> Option<(ConnectionId, mpsc::Receiver<String>)> {
        if self.state != SessionState::Connecting {
            return None;
        }
        let (id, rx) = self.hub.connect();
        self.id = Some(id);
        self.state = SessionState::Active;
        Some((id, rx))
    }

    /// Leave the hub and announce the new presence. Later calls do nothing.
    pub fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        match (previous, self.id) {
            (SessionState::Active, Some(id)) => self.hub.disconnect(id),
            (SessionState::Closed, _) => {}
            _ => debug!("Session closed before it became active"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            out.push(serde_json::from_str(&frame).unwrap());
        }
        out
    }

    #[test]
    fn walks_connecting_active_closed() {
        let hub = Arc::new(Hub::new(8));
        let mut session = Session::new(hub.clone());
        assert_eq!(session.state(), SessionState::Connecting);

        let (id, _rx) = session.activate().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.id(), Some(id));
        assert!(hub.is_connected(id));
        assert!(session.activate().is_none());

        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!hub.is_connected(id));
        assert!(session.activate().is_none());
    }

    #[test]
    fn close_announces_presence_exactly_once() {
        let hub = Arc::new(Hub::new(8));
        let mut observer = Session::new(hub.clone());
        let (_, mut observer_rx) = observer.activate().unwrap();

        let mut leaving = Session::new(hub.clone());
        let (_, _leaving_rx) = leaving.activate().unwrap();
        drain(&mut observer_rx);

        leaving.close();
        leaving.close();
        drop(leaving);

        assert_eq!(drain(&mut observer_rx), vec![json!({"type":"presence","payload":{"online":1}})]);
    }

    #[test]
    fn drop_closes_an_active_session() {
        let hub = Arc::new(Hub::new(8));
        let mut observer = Session::new(hub.clone());
        let (_, mut observer_rx) = observer.activate().unwrap();

        {
            let mut session = Session::new(hub.clone());
            session.activate().unwrap();
            assert_eq!(hub.online(), 2);
        }

        assert_eq!(hub.online(), 1);
        let frames = drain(&mut observer_rx);
        assert_eq!(frames.last(), Some(&json!({"type":"presence","payload":{"online":1}})));
    }

    #[test]
    fn closing_before_activation_touches_nothing() {
        let hub = Arc::new(Hub::new(8));
        let mut observer = Session::new(hub.clone());
        let (_, mut observer_rx) = observer.activate().unwrap();
        drain(&mut observer_rx);

        let mut session = Session::new(hub.clone());
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(drain(&mut observer_rx).is_empty());
    }
}
