//! # Connector
//!
//! Resolves a remote address, establishes the socket, and produces a session
//! symmetric to the ones the listener produces.
//!
//! Every failure along resolve/connect/construct is terminal for that attempt
//! and surfaced to the caller. Retry and backoff belong a layer up.

use std::io;
use std::sync::Arc;

use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info};

use crate::error::{ProtocolError, Result};
use crate::transport::manager::SessionManager;
use crate::transport::session::{Session, SessionFactory};

/// Outbound counterpart to the listener.
pub struct Connector {
    factory: SessionFactory,
    manager: Arc<SessionManager>,
}

impl Connector {
    pub fn new(factory: SessionFactory, manager: Arc<SessionManager>) -> Self {
        Self { factory, manager }
    }

    /// Resolve `host:port`, connect, build a session through the injected
    /// factory, open it, and register it with the manager.
    pub async fn connect(&self, host: &str, port: u16) -> Result<Arc<Session>> {
        info!(host, port, "connecting");

        let mut last_error: Option<io::Error> = None;
        let mut stream = None;
        for addr in lookup_host((host, port)).await? {
            match TcpStream::connect(addr).await {
                Ok(connected) => {
                    stream = Some(connected);
                    break;
                }
                Err(e) => {
                    debug!(address = %addr, error = %e, "endpoint unreachable");
                    last_error = Some(e);
                }
            }
        }

        let stream = match stream {
            Some(stream) => stream,
            None => {
                return Err(match last_error {
                    Some(e) => ProtocolError::Io(e),
                    // lookup_host succeeded but yielded no addresses
                    None => ProtocolError::InvalidValue(format!(
                        "no addresses resolved for {host}:{port}"
                    )),
                });
            }
        };

        let id = self.manager.next_id();
        let session = (self.factory)(id, stream).ok_or(ProtocolError::ConnectionClosed)?;

        session.open();
        self.manager.add(session.clone());
        info!(host, port, id, peer = %session.peer_addr(), "connected");
        Ok(session)
    }
}
