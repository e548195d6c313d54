//! # Transport Layer
//!
//! Sessions over TCP sockets, the acceptor that produces them inbound, the
//! connector that produces them outbound, and the shared table of live
//! sessions.
//!
//! All mutable state crossing a suspension point is either atomic (the
//! session state, the draining flag) or behind the concurrency utilities;
//! execution may resume on any runtime worker thread.

pub mod connector;
pub mod listener;
pub mod manager;
pub mod session;

pub use connector::Connector;
pub use listener::Listener;
pub use manager::{AutoRemoveHooks, SessionManager};
pub use session::{NoopHooks, Session, SessionFactory, SessionHooks, SessionId, SessionState};
