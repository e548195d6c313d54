//! # Cursor Buffers
//!
//! Bounds-checked sequential readers and writers over borrowed byte regions.
//!
//! [`FrameReader`] walks a received frame body; [`FrameWriter`] fills an
//! outbound buffer. Both advance an internal cursor by the encoded width of
//! each value and fail with [`ProtocolError::BufferOverrun`] before touching
//! anything out of range. An overrun means the header and body disagree, and
//! callers must treat it as fatal for the current frame.
//!
//! Indexed access (`get_at`/`put_at`) is independent of the cursor and exists
//! for the header rewrite-after-serialize pattern, where the length field is
//! only known once the body has been written.

use crate::core::wire::Wire;
use crate::error::{ProtocolError, Result};

fn check_bounds(at: usize, wanted: usize, buffer_size: usize) -> Result<()> {
    // Checked: `wanted` can be caller-supplied and near usize::MAX.
    match at.checked_add(wanted) {
        Some(end) if end <= buffer_size => Ok(()),
        _ => Err(ProtocolError::BufferOverrun {
            wanted,
            at,
            buffer_size,
        }),
    }
}

/// Read cursor over a borrowed byte region.
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the region.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the next value and advance the cursor by its width.
    pub fn get<T: Wire>(&mut self) -> Result<T> {
        check_bounds(self.pos, T::WIDTH, self.data.len())?;
        let value = T::decode(&self.data[self.pos..self.pos + T::WIDTH])?;
        self.pos += T::WIDTH;
        Ok(value)
    }

    /// Random-access read at `at`, without moving the cursor.
    pub fn get_at<T: Wire>(&self, at: usize) -> Result<T> {
        check_bounds(at, T::WIDTH, self.data.len())?;
        T::decode(&self.data[at..at + T::WIDTH])
    }

    /// Read a u16-length-prefixed UTF-8 string and advance past it.
    ///
    /// The length prefix is validated against the remaining capacity before
    /// any bytes are copied.
    pub fn get_string(&mut self) -> Result<String> {
        let length = self.get::<u16>()? as usize;
        check_bounds(self.pos, length, self.data.len())?;

        let bytes = &self.data[self.pos..self.pos + length];
        let value = std::str::from_utf8(bytes)
            .map_err(|e| ProtocolError::InvalidValue(format!("string is not UTF-8: {e}")))?
            .to_owned();
        self.pos += length;
        Ok(value)
    }

    /// Read exactly `length` raw bytes and advance past them.
    pub fn get_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        check_bounds(self.pos, length, self.data.len())?;
        let bytes = &self.data[self.pos..self.pos + length];
        self.pos += length;
        Ok(bytes)
    }

    /// Advance the cursor by `n` bytes without decoding.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        check_bounds(self.pos, n, self.data.len())?;
        self.pos += n;
        Ok(())
    }
}

/// Write cursor over a borrowed mutable byte region.
pub struct FrameWriter<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> FrameWriter<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position, i.e. the number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the region.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Write the next value and advance the cursor by its width.
    pub fn put<T: Wire>(&mut self, value: T) -> Result<()> {
        check_bounds(self.pos, T::WIDTH, self.data.len())?;
        value.encode(&mut self.data[self.pos..self.pos + T::WIDTH]);
        self.pos += T::WIDTH;
        Ok(())
    }

    /// Random-access write at `at`, without moving the cursor.
    ///
    /// Used to patch a length field after the body it describes has been
    /// serialized.
    pub fn put_at<T: Wire>(&mut self, at: usize, value: T) -> Result<()> {
        check_bounds(at, T::WIDTH, self.data.len())?;
        value.encode(&mut self.data[at..at + T::WIDTH]);
        Ok(())
    }

    /// Write a u16-length-prefixed UTF-8 string and advance past it.
    ///
    /// Encoding conversion is the caller's responsibility; the bytes go out
    /// exactly as they are in the `&str`.
    pub fn put_string(&mut self, value: &str) -> Result<()> {
        let length = value.len();
        if length > u16::MAX as usize {
            return Err(ProtocolError::InvalidValue(format!(
                "string length {length} exceeds u16 prefix"
            )));
        }
        self.put::<u16>(length as u16)?;
        self.put_bytes(value.as_bytes())
    }

    /// Write raw bytes and advance past them.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        check_bounds(self.pos, bytes.len(), self.data.len())?;
        self.data[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}
