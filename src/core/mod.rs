//! # Core Framing Components
//!
//! Low-level wire primitives, cursor buffers, and the frame header.
//!
//! This module is the foundation of the protocol: everything here is pure and
//! socket-free, so the whole framing layer can be exercised without I/O.
//!
//! ## Components
//! - **wire**: fixed-width little-endian encode/decode
//! - **buffer**: bounds-checked read/write cursors over borrowed regions
//! - **frame**: the 3-byte `[length: u16][tag: u8]` header
//!
//! ## Wire Format
//! ```text
//! [Length(2, LE)] [Tag(1)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Maximum payload size: 64 KiB (length is validated before allocation)
//! - Tag 0 is reserved; frames carrying it are rejected
//! - Infinite floats decoded from the wire are rejected

pub mod buffer;
pub mod frame;
pub mod wire;
