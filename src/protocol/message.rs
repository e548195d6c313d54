//! # Message Abstraction
//!
//! The payload capability the framing core moves around without knowing its
//! contents: a type tag plus symmetric encode/decode over the cursor buffers.
//!
//! Concrete message kinds form a closed set known at registry-setup time;
//! they are constructed by tag-resolved factories and dispatched through
//! registered handler functions rather than an inheritance hierarchy.

use std::any::Any;

use bytes::Bytes;

use crate::core::buffer::{FrameReader, FrameWriter};
use crate::core::frame::{FrameHeader, MessageType, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use crate::error::{ProtocolError, Result};

/// An opaque frame payload identified by its type tag.
pub trait Message: Send + Sync {
    /// Tag this payload is registered under; never 0.
    fn type_tag(&self) -> MessageType;

    /// Upper bound on the encoded payload size, used to size the outbound
    /// buffer. `encode` may write less; it must not need more.
    fn encoded_len(&self) -> usize;

    /// Serialize the payload into `dst`.
    fn encode(&self, dst: &mut FrameWriter<'_>) -> Result<()>;

    /// Deserialize the payload from a received frame body.
    fn decode(&mut self, src: &mut FrameReader<'_>) -> Result<()>;

    /// Handler-side downcast point; implement as `self`.
    fn as_any(&self) -> &dyn Any;
}

/// Encode `msg` as one contiguous wire frame: header first, then payload.
///
/// The body is serialized into a buffer with a header-sized gap, the buffer
/// is truncated to what was actually written, and the header is patched in
/// afterwards with the real payload length.
pub fn encode_message(msg: &dyn Message) -> Result<Bytes> {
    let reserved = msg.encoded_len();
    if reserved > MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::OversizedPayload(reserved));
    }

    let mut buf = vec![0u8; HEADER_SIZE + reserved];
    let written = {
        let mut writer = FrameWriter::new(&mut buf[HEADER_SIZE..]);
        msg.encode(&mut writer)?;
        writer.position()
    };
    buf.truncate(HEADER_SIZE + written);

    let header = FrameHeader {
        length: written as u16,
        tag: msg.type_tag(),
    };
    header.write_to(&mut buf[..HEADER_SIZE])?;

    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        value: u32,
        label: String,
    }

    impl Message for Sample {
        fn type_tag(&self) -> MessageType {
            0x10
        }

        fn encoded_len(&self) -> usize {
            4 + 2 + self.label.len()
        }

        fn encode(&self, dst: &mut FrameWriter<'_>) -> Result<()> {
            dst.put(self.value)?;
            dst.put_string(&self.label)
        }

        fn decode(&mut self, src: &mut FrameReader<'_>) -> Result<()> {
            self.value = src.get()?;
            self.label = src.get_string()?;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn frame_carries_header_then_payload() {
        let msg = Sample {
            value: 0x01020304,
            label: "ab".to_owned(),
        };
        let frame = encode_message(&msg).unwrap();

        assert_eq!(frame.len(), HEADER_SIZE + 8);
        // length=8 LE, tag=0x10
        assert_eq!(&frame[..HEADER_SIZE], &[0x08, 0x00, 0x10]);
        assert_eq!(&frame[HEADER_SIZE..HEADER_SIZE + 4], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn round_trip_through_frame_body() {
        let msg = Sample {
            value: 99,
            label: "forty-two".to_owned(),
        };
        let frame = encode_message(&msg).unwrap();

        let header =
            FrameHeader::read_from(frame[..HEADER_SIZE].try_into().unwrap()).unwrap();
        assert_eq!(header.length as usize, frame.len() - HEADER_SIZE);
        assert_eq!(header.tag, 0x10);

        let mut decoded = Sample {
            value: 0,
            label: String::new(),
        };
        let mut reader = FrameReader::new(&frame[HEADER_SIZE..]);
        decoded.decode(&mut reader).unwrap();
        assert_eq!(decoded.value, 99);
        assert_eq!(decoded.label, "forty-two");
    }

    struct Oversized;

    impl Message for Oversized {
        fn type_tag(&self) -> MessageType {
            0x11
        }

        fn encoded_len(&self) -> usize {
            MAX_PAYLOAD_SIZE + 1
        }

        fn encode(&self, _dst: &mut FrameWriter<'_>) -> Result<()> {
            Ok(())
        }

        fn decode(&mut self, _src: &mut FrameReader<'_>) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn oversized_payload_rejected_before_allocation() {
        assert!(matches!(
            encode_message(&Oversized),
            Err(ProtocolError::OversizedPayload(_))
        ));
    }

    struct Shrinking;

    impl Message for Shrinking {
        fn type_tag(&self) -> MessageType {
            0x12
        }

        fn encoded_len(&self) -> usize {
            64 // deliberate over-reservation
        }

        fn encode(&self, dst: &mut FrameWriter<'_>) -> Result<()> {
            dst.put(0xABu8)
        }

        fn decode(&mut self, _src: &mut FrameReader<'_>) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn header_length_reflects_bytes_actually_written() {
        let frame = encode_message(&Shrinking).unwrap();
        assert_eq!(frame.len(), HEADER_SIZE + 1);
        assert_eq!(&frame[..], &[0x01, 0x00, 0x12, 0xAB]);
    }
}
