//! # Frame Header
//!
//! The fixed 3-byte header that precedes every payload on the wire.
//!
//! ## Wire Format
//! ```text
//! [payload_length: u16 LE] [type_tag: u8] [payload: payload_length bytes]
//! ```
//!
//! `payload_length` excludes the header itself. Tag `0` is reserved as
//! invalid/unresolved and never appears in a well-formed frame.

use crate::core::buffer::{FrameReader, FrameWriter};
use crate::error::{ProtocolError, Result};

/// Tag identifying the payload type of a frame.
pub type MessageType = u8;

/// Reserved tag value; decoding it is a framing error.
pub const INVALID_MESSAGE_TYPE: MessageType = 0;

/// Total header size on the wire, in bytes.
pub const HEADER_SIZE: usize = 3;

/// Largest payload a single frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length in bytes, excluding the header.
    pub length: u16,
    /// Payload type tag; never [`INVALID_MESSAGE_TYPE`] once decoded.
    pub tag: MessageType,
}

impl FrameHeader {
    /// Decode a header from exactly [`HEADER_SIZE`] bytes.
    pub fn read_from(src: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut reader = FrameReader::new(src);
        let length = reader.get::<u16>()?;
        let tag = reader.get::<MessageType>()?;

        if tag == INVALID_MESSAGE_TYPE {
            return Err(ProtocolError::InvalidValue(
                "reserved message type 0 in frame header".to_owned(),
            ));
        }

        Ok(Self { length, tag })
    }

    /// Encode this header into the first [`HEADER_SIZE`] bytes of `dst`.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<()> {
        let mut writer = FrameWriter::new(dst);
        writer.put::<u16>(self.length)?;
        writer.put::<MessageType>(self.tag)
    }
}
