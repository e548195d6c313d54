//! # Listener
//!
//! Binds an acceptor and turns inbound connections into registered, open
//! sessions via an injected [`SessionFactory`].
//!
//! A failed accept or a factory refusal is fatal for that iteration only; the
//! loop keeps accepting until [`Listener::stop`] runs.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::net::{TcpListener, ToSocketAddrs};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::Result;
use crate::transport::manager::SessionManager;
use crate::transport::session::SessionFactory;

/// Accept loop over one bound TCP acceptor.
pub struct Listener {
    acceptor: Mutex<Option<TcpListener>>,
    local_addr: SocketAddr,
    factory: SessionFactory,
    manager: Arc<SessionManager>,
    listening: AtomicBool,
    cancel: CancellationToken,
}

impl Listener {
    /// Bind the acceptor. Accepting starts with [`Listener::start`].
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        factory: SessionFactory,
        manager: Arc<SessionManager>,
    ) -> Result<Arc<Self>> {
        let acceptor = TcpListener::bind(addr).await?;
        let local_addr = acceptor.local_addr()?;

        Ok(Arc::new(Self {
            acceptor: Mutex::new(Some(acceptor)),
            local_addr,
            factory,
            manager,
            listening: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }))
    }

    /// Address the acceptor is bound to; useful with port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// Spawn the accept loop. Starting twice is a no-op.
    pub fn start(self: &Arc<Self>) {
        if self.listening.swap(true, Ordering::AcqRel) {
            return;
        }
        let acceptor = self
            .acceptor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(acceptor) = acceptor else {
            // Already stopped before the first start.
            self.listening.store(false, Ordering::Release);
            return;
        };

        info!(address = %self.local_addr, "listening");
        let listener = self.clone();
        tokio::spawn(async move { listener.accept_loop(acceptor).await });
    }

    /// Stop accepting and release the acceptor. Idempotent; live sessions
    /// are untouched.
    pub fn stop(&self) {
        if !self.listening.swap(false, Ordering::AcqRel) {
            return;
        }
        info!(address = %self.local_addr, "listener stopping");
        self.cancel.cancel();
    }

    async fn accept_loop(self: Arc<Self>, acceptor: TcpListener) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                accepted = acceptor.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let id = self.manager.next_id();
                            match (self.factory)(id, stream) {
                                Some(session) => {
                                    session.open();
                                    self.manager.add(session);
                                }
                                None => {
                                    error!(peer = %peer, "session factory refused connection");
                                }
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "error on accepting");
                        }
                    }
                }
            }
        }
        info!(address = %self.local_addr, "listener stopped");
    }
}
