//! # framelink
//!
//! Asynchronous TCP message framing and session toolkit.
//!
//! framelink frames length-prefixed binary messages over stream sockets and
//! manages the lifecycle of the connections that carry them: a listener
//! accepts inbound connections, a connector establishes outbound ones, and
//! both hand their sockets to sessions that drive a framing read loop and a
//! FIFO write loop. A tag-keyed resolver maps each inbound frame to a payload
//! factory and handler, and thread-safe queue/registry containers make the
//! pipeline usable from concurrent contexts.
//!
//! ## Wire Format
//! ```text
//! [payload_length: u16 LE] [type_tag: u8] [payload: payload_length bytes]
//! ```
//!
//! ## Layers
//! - [`core`]: wire primitives, cursor buffers, frame header (pure, no I/O)
//! - [`util`]: concurrent queue and registry
//! - [`protocol`]: the [`protocol::Message`] capability and the tag resolver
//! - [`transport`]: sessions, listener, connector, session manager
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use framelink::protocol::MessageResolver;
//! use framelink::transport::{Listener, NoopHooks, Session, SessionManager};
//!
//! # async fn run() -> framelink::error::Result<()> {
//! let resolver = Arc::new(MessageResolver::new());
//! let manager = Arc::new(SessionManager::new());
//!
//! let factory = Session::default_factory(resolver.clone(), Arc::new(NoopHooks));
//! let listener = Listener::bind("127.0.0.1:7777", factory, manager.clone()).await?;
//! listener.start();
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Policy
//! Every framing or I/O failure closes the affected session; nothing is
//! retried inside this crate. Reconnect and backoff policy belong to the
//! caller.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod util;

pub use error::{ProtocolError, Result};
