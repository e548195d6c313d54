//! # Message Type Resolver
//!
//! Maps wire type tags to payload factories and handlers.
//!
//! Factories and handlers live in two independent registries because they
//! are registered by different layers at different times: the transport setup
//! registers factories, while a higher protocol layer may attach handlers
//! after traffic is already flowing. A tag with a factory but no handler is
//! "decode, then drop", a valid outcome distinct from the session-fatal
//! unknown-type condition.

use std::sync::Arc;

use crate::core::frame::MessageType;
use crate::protocol::message::Message;
use crate::transport::session::Session;
use crate::util::ConcurrentRegistry;

/// Constructs an empty payload of the registered kind; the read loop decodes
/// the frame body into it afterwards.
pub type MessageFactory = Arc<dyn Fn() -> Box<dyn Message> + Send + Sync>;

/// Invoked after a successful decode, with shared ownership of the session so
/// the handler may send or close through it.
pub type MessageHandler = Arc<dyn Fn(Box<dyn Message>, Arc<Session>) + Send + Sync>;

/// Tag → factory and tag → handler lookup, resolved once per inbound frame.
pub struct MessageResolver {
    factories: ConcurrentRegistry<MessageType, MessageFactory>,
    handlers: ConcurrentRegistry<MessageType, MessageHandler>,
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageResolver {
    pub fn new() -> Self {
        Self {
            factories: ConcurrentRegistry::new(),
            handlers: ConcurrentRegistry::new(),
        }
    }

    /// Register payload constructors in bulk. Later registrations for the
    /// same tag replace earlier ones.
    pub fn register_factories(&self, factories: Vec<(MessageType, MessageFactory)>) {
        for (tag, factory) in factories {
            self.factories.insert_or_assign(tag, factory);
        }
    }

    /// Register handlers in bulk; safe to call while sessions are running.
    pub fn register_handlers(&self, handlers: Vec<(MessageType, MessageHandler)>) {
        for (tag, handler) in handlers {
            self.handlers.insert_or_assign(tag, handler);
        }
    }

    /// `None` means no factory is registered for `tag`; the unknown-type
    /// condition, fatal to the session that received the frame.
    pub fn resolve_factory(&self, tag: MessageType) -> Option<MessageFactory> {
        self.factories.try_get(&tag)
    }

    /// `None` means decode-then-drop for this tag.
    pub fn resolve_handler(&self, tag: MessageType) -> Option<MessageHandler> {
        self.handlers.try_get(&tag)
    }
}
