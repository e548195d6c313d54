//! # Error Types
//!
//! Error handling for the framing and session core.
//!
//! This module defines all error variants that can occur while encoding,
//! decoding, and transporting frames, from low-level I/O errors to
//! framing-contract violations.
//!
//! ## Error Categories
//! - **I/O Errors**: socket read/write/connect/resolve failures
//! - **Framing Errors**: bounds violations, invalid values, oversized payloads
//! - **Protocol Errors**: unknown message types, closed connections
//!
//! Codec- and buffer-level errors are contract violations: a session that
//! observes one must treat the current frame as untrusted and close the
//! connection. Sending on or closing an already-closed session is *not* an
//! error; both are silent no-ops by contract.

use std::io;
use thiserror::Error;

/// Primary error type for all framing and transport operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("buffer overrun: wanted {wanted} bytes at position {at} in buffer of {buffer_size}")]
    BufferOverrun {
        wanted: usize,
        at: usize,
        buffer_size: usize,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("unknown message type: {0:#04x}")]
    UnknownMessageType(u8),

    #[error("payload too large: {0} bytes")]
    OversizedPayload(usize),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_overrun_formats_positions() {
        let err = ProtocolError::BufferOverrun {
            wanted: 4,
            at: 6,
            buffer_size: 8,
        };
        let text = err.to_string();
        assert!(text.contains("wanted 4"));
        assert!(text.contains("position 6"));
        assert!(text.contains("buffer of 8"));
    }

    #[test]
    fn unknown_type_formats_as_hex() {
        let err = ProtocolError::UnknownMessageType(0x2A);
        assert!(err.to_string().contains("0x2a"));
    }
}
