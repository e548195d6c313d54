//! # Session Manager
//!
//! The shared table of live sessions, keyed by [`SessionId`].
//!
//! One manager is constructed at startup and injected into the listener and
//! connector; there is no process-global state. Accepted and dialed sessions
//! are added here, and an `on_close` hook removes them again:
//! [`AutoRemoveHooks`] wires that up, or the application supplies its own.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use bytes::Bytes;
use tracing::debug;

use crate::error::Result;
use crate::protocol::message::{encode_message, Message};
use crate::transport::session::{Session, SessionHooks, SessionId};
use crate::util::ConcurrentRegistry;

/// Thread-safe registry of live sessions with broadcast fan-out.
pub struct SessionManager {
    sessions: ConcurrentRegistry<SessionId, Arc<Session>>,
    id_generator: AtomicU32,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: ConcurrentRegistry::new(),
            id_generator: AtomicU32::new(0),
        }
    }

    /// Next unique session id. Ids start at 1; 0 is never handed out.
    pub fn next_id(&self) -> SessionId {
        self.id_generator.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add(&self, session: Arc<Session>) {
        debug!(id = session.id(), peer = %session.peer_addr(), "session registered");
        self.sessions.insert_or_assign(session.id(), session);
    }

    /// Remove a session from the table; returns whether it was present.
    /// Does not close the session.
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.erase(&id);
        if removed {
            debug!(id, "session deregistered");
        }
        removed
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.try_get(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Encode `message` once and queue the frame on every live session,
    /// optionally skipping the sender.
    pub fn broadcast(&self, message: &dyn Message, except: Option<SessionId>) -> Result<()> {
        let frame = encode_message(message)?;
        self.broadcast_frame(frame, except);
        Ok(())
    }

    /// Fan an already-encoded frame out to every live session except
    /// `except`. The shared `Bytes` makes each enqueue a cheap clone.
    pub fn broadcast_frame(&self, frame: Bytes, except: Option<SessionId>) {
        match except {
            Some(sender) => self.sessions.for_each_some(
                |session| session.id() != sender,
                |session| session.send_frame(frame.clone()),
            ),
            None => self
                .sessions
                .for_each_all(|session| session.send_frame(frame.clone())),
        }
    }

    /// Close every session and empty the table. Called at shutdown, after
    /// the listener has stopped accepting.
    pub fn close_all(&self) {
        // Collected first: `close` runs `on_close` hooks, which are allowed
        // to call back into this manager.
        let mut live = Vec::with_capacity(self.sessions.len());
        self.sessions.for_each_all(|session| live.push(session.clone()));
        self.sessions.clear();

        for session in live {
            session.close();
        }
    }
}

/// Hooks that deregister a session from its manager when it closes.
///
/// Holds the manager weakly so the manager's ownership of its sessions does
/// not become a cycle. Compose further lifecycle behavior by wrapping or
/// replacing this in an application-provided [`SessionHooks`].
pub struct AutoRemoveHooks {
    manager: Weak<SessionManager>,
}

impl AutoRemoveHooks {
    pub fn new(manager: &Arc<SessionManager>) -> Arc<Self> {
        Arc::new(Self {
            manager: Arc::downgrade(manager),
        })
    }
}

impl SessionHooks for AutoRemoveHooks {
    fn on_close(&self, session: &Session) {
        if let Some(manager) = self.manager.upgrade() {
            manager.remove(session.id());
        }
    }
}
