//! # Session
//!
//! One connected socket, its framing read loop, and its outbound drain loop.
//!
//! A session is shared-owned: the read loop, any in-flight drain task, and
//! handler-held references all hold counted handles, and the socket is torn
//! down only after `close` has run and the last handle drops. State
//! transitions go through atomic compare-and-exchange so the close
//! side-effects run exactly once no matter how many tasks race into
//! [`Session::close`].
//!
//! ## Failure Semantics
//! Every failure on the socket or in the codec, from a short header read to
//! a decode error, funnels into `close`. Nothing is retried here; reconnect
//! policy belongs to the caller.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::core::buffer::FrameReader;
use crate::core::frame::{FrameHeader, HEADER_SIZE};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::{encode_message, Message};
use crate::protocol::resolver::MessageResolver;
use crate::util::ConcurrentQueue;

/// Identifier assigned by the session manager; unique per process.
pub type SessionId = u32;

/// Builds a session around a freshly connected socket. Shared by listener
/// and connector so both sides produce identical sessions. Returning `None`
/// aborts that connection only.
pub type SessionFactory = Arc<dyn Fn(SessionId, TcpStream) -> Option<Arc<Session>> + Send + Sync>;

/// Lifecycle of a session. `Closed` is both initial and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Closed = 0,
    Open = 1,
    Closing = 2,
}

/// Extension points for protocol-specific behavior, replacing subclassing.
///
/// `on_open`/`on_close` bracket the session lifetime; `on_start`/`on_stop`
/// bracket the read loop. All default to no-ops.
pub trait SessionHooks: Send + Sync {
    fn on_open(&self, _session: &Arc<Session>) {}
    fn on_start(&self, _session: &Arc<Session>) {}
    fn on_stop(&self, _session: &Arc<Session>) {}
    fn on_close(&self, _session: &Session) {}
}

/// Hooks that do nothing.
pub struct NoopHooks;

impl SessionHooks for NoopHooks {}

/// A framed, bidirectional connection over one TCP socket.
pub struct Session {
    id: SessionId,
    state: AtomicU8,
    opened: AtomicBool,
    draining: AtomicBool,
    cancel: CancellationToken,
    reader: Mutex<Option<OwnedReadHalf>>,
    writer: Mutex<Option<OwnedWriteHalf>>,
    send_queue: ConcurrentQueue<Bytes>,
    resolver: Arc<MessageResolver>,
    hooks: Arc<dyn SessionHooks>,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
}

impl Session {
    /// Take ownership of an already-connected socket. Does not start I/O;
    /// call [`Session::open`] for that.
    pub fn new(
        id: SessionId,
        stream: TcpStream,
        resolver: Arc<MessageResolver>,
        hooks: Arc<dyn SessionHooks>,
    ) -> Result<Arc<Self>> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let (read_half, write_half) = stream.into_split();

        Ok(Arc::new(Self {
            id,
            state: AtomicU8::new(SessionState::Closed as u8),
            opened: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            reader: Mutex::new(Some(read_half)),
            writer: Mutex::new(Some(write_half)),
            send_queue: ConcurrentQueue::new(),
            resolver,
            hooks,
            local_addr,
            peer_addr,
        }))
    }

    /// A [`SessionFactory`] producing plain sessions with the given resolver
    /// and hooks.
    pub fn default_factory(
        resolver: Arc<MessageResolver>,
        hooks: Arc<dyn SessionHooks>,
    ) -> SessionFactory {
        Arc::new(move |id, stream| {
            match Session::new(id, stream, resolver.clone(), hooks.clone()) {
                Ok(session) => Some(session),
                Err(e) => {
                    error!(id, error = %e, "failed to construct session");
                    None
                }
            }
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        match self.state.load(Ordering::Acquire) {
            1 => SessionState::Open,
            2 => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) == SessionState::Open as u8
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Transition `Closed → Open` and spawn the read loop. A session opens
    /// at most once; repeat calls are no-ops.
    pub fn open(self: &Arc<Self>) {
        if self.opened.swap(true, Ordering::AcqRel) {
            return;
        }
        if self
            .state
            .compare_exchange(
                SessionState::Closed as u8,
                SessionState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        trace!(id = self.id, peer = %self.peer_addr, "session opened");
        self.hooks.on_open(self);

        let session = self.clone();
        tokio::spawn(async move { session.read_loop().await });
    }

    /// Transition `Open → Closing` exactly once, run the close side-effects,
    /// and schedule socket teardown. Safe to call any number of times from
    /// any task; losers of the compare-and-exchange return immediately.
    pub fn close(self: &Arc<Self>) {
        if self
            .state
            .compare_exchange(
                SessionState::Open as u8,
                SessionState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        trace!(id = self.id, peer = %self.peer_addr, "session closing");
        self.cancel.cancel();
        // Buffered-but-unsent frames are abandoned: at-most-once delivery.
        self.send_queue.clear();
        self.hooks.on_close(self);

        let session = self.clone();
        tokio::spawn(async move {
            if let Some(mut writer) = session.writer.lock().await.take() {
                if let Err(e) = writer.shutdown().await {
                    debug!(id = session.id, error = %e, "error on shutdown socket");
                }
            }
            session.state.store(SessionState::Closed as u8, Ordering::Release);
        });
    }

    /// Serialize `message` as one contiguous frame and queue it for sending.
    ///
    /// Sending on a session that is not open is a silent no-op; the caller
    /// may not yet know the peer disconnected.
    pub fn send_message(self: &Arc<Self>, message: &dyn Message) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        let frame = encode_message(message)?;
        self.send_frame(frame);
        Ok(())
    }

    /// Queue an already-encoded frame. Lets broadcast fan-out serialize a
    /// message once and share the bytes across sessions.
    pub fn send_frame(self: &Arc<Self>, frame: Bytes) {
        if !self.is_open() {
            return;
        }
        self.send_queue.push(frame);

        // At most one drain task per session.
        if self.draining.swap(true, Ordering::AcqRel) {
            return;
        }
        let session = self.clone();
        tokio::spawn(async move { session.drain_send_queue().await });
    }

    async fn drain_send_queue(self: Arc<Self>) {
        loop {
            while let Some(frame) = self.send_queue.pop() {
                let mut guard = self.writer.lock().await;
                let Some(writer) = guard.as_mut() else {
                    // Teardown already took the socket.
                    self.draining.store(false, Ordering::Release);
                    return;
                };
                if let Err(e) = writer.write_all(&frame).await {
                    drop(guard);
                    error!(id = self.id, peer = %self.peer_addr, error = %e, "error on sending frame");
                    self.close();
                    self.draining.store(false, Ordering::Release);
                    return;
                }
            }

            self.draining.store(false, Ordering::Release);

            // A producer may have pushed between the last pop and the flag
            // release; resume only if we win the flag back.
            if self.send_queue.is_empty() {
                return;
            }
            if self.draining.swap(true, Ordering::AcqRel) {
                return;
            }
        }
    }

    async fn read_loop(self: Arc<Self>) {
        self.hooks.on_start(&self);

        let taken = self.reader.lock().await.take();
        if let Some(mut reader) = taken {
            while self.is_open() {
                match self.read_frame(&mut reader).await {
                    Ok(Some((header, body))) => {
                        if let Err(e) = self.dispatch(header, body) {
                            warn!(id = self.id, peer = %self.peer_addr, error = %e,
                                "inbound frame rejected");
                            self.close();
                            break;
                        }
                    }
                    // Closed while waiting for a frame.
                    Ok(None) => break,
                    Err(e) => {
                        if self.is_open() {
                            debug!(id = self.id, peer = %self.peer_addr, error = %e,
                                "error on receiving frame");
                        }
                        self.close();
                        break;
                    }
                }
            }
        }

        self.hooks.on_stop(&self);
    }

    /// Read one `header → body` frame. `Ok(None)` means the session was
    /// closed while waiting and the loop should stop.
    async fn read_frame(&self, reader: &mut OwnedReadHalf) -> Result<Option<(FrameHeader, Vec<u8>)>> {
        let mut header_buf = [0u8; HEADER_SIZE];
        tokio::select! {
            _ = self.cancel.cancelled() => return Ok(None),
            res = reader.read_exact(&mut header_buf) => { res?; }
        }

        let header = FrameHeader::read_from(&header_buf)?;

        let mut body = vec![0u8; header.length as usize];
        tokio::select! {
            _ = self.cancel.cancelled() => return Ok(None),
            res = reader.read_exact(&mut body) => { res?; }
        }

        Ok(Some((header, body)))
    }

    fn dispatch(self: &Arc<Self>, header: FrameHeader, body: Vec<u8>) -> Result<()> {
        let factory = self
            .resolver
            .resolve_factory(header.tag)
            .ok_or(ProtocolError::UnknownMessageType(header.tag))?;

        let mut message = factory();
        let mut reader = FrameReader::new(&body);
        message.decode(&mut reader)?;

        match self.resolver.resolve_handler(header.tag) {
            Some(handler) => handler(message, self.clone()),
            None => trace!(id = self.id, tag = header.tag, "no handler registered, message dropped"),
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // A leak of the underlying socket; loud on purpose.
        if self.state.load(Ordering::Acquire) == SessionState::Open as u8 {
            warn!(id = self.id, "session dropped while still open");
        }
    }
}
