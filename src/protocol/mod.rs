//! # Protocol Layer
//!
//! The message capability and the tag → factory/handler resolver that the
//! session read loop dispatches through.

pub mod message;
pub mod resolver;

pub use message::{encode_message, Message};
pub use resolver::{MessageFactory, MessageHandler, MessageResolver};
