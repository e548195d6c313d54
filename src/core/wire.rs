//! # Wire Primitives
//!
//! Fixed-width encode/decode for the numeric types that can appear inside a
//! frame, with explicit endianness normalization.
//!
//! The wire format is little-endian regardless of host byte order; every
//! implementation goes through `to_le_bytes`/`from_le_bytes` so big-endian
//! hosts normalize at the boundary. Floating-point decodes that resolve to an
//! infinity are rejected with [`ProtocolError::InvalidValue`]; a length or
//! coordinate that decodes to `inf` is always a corrupt or hostile frame.

use crate::error::{ProtocolError, Result};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width value with a defined little-endian wire encoding.
///
/// Implemented for the primitive integer and float types plus `bool`; the
/// trait is sealed because the frame layout depends on this exact set.
pub trait Wire: Sized + Copy + sealed::Sealed {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decode from exactly [`Self::WIDTH`] bytes.
    fn decode(src: &[u8]) -> Result<Self>;

    /// Encode into exactly [`Self::WIDTH`] bytes.
    fn encode(self, dst: &mut [u8]);
}

fn width_mismatch(wanted: usize, got: usize) -> ProtocolError {
    ProtocolError::BufferOverrun {
        wanted,
        at: 0,
        buffer_size: got,
    }
}

macro_rules! wire_int {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl Wire for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn decode(src: &[u8]) -> Result<Self> {
                let bytes: [u8; std::mem::size_of::<$ty>()] = src
                    .try_into()
                    .map_err(|_| width_mismatch(Self::WIDTH, src.len()))?;
                Ok(<$ty>::from_le_bytes(bytes))
            }

            fn encode(self, dst: &mut [u8]) {
                dst.copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

wire_int!(u8, i8, u16, i16, u32, i32, u64, i64);

macro_rules! wire_float {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl Wire for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn decode(src: &[u8]) -> Result<Self> {
                let bytes: [u8; std::mem::size_of::<$ty>()] = src
                    .try_into()
                    .map_err(|_| width_mismatch(Self::WIDTH, src.len()))?;
                let value = <$ty>::from_le_bytes(bytes);
                if value.is_infinite() {
                    return Err(ProtocolError::InvalidValue(format!(
                        "infinite {} on the wire",
                        stringify!($ty)
                    )));
                }
                Ok(value)
            }

            fn encode(self, dst: &mut [u8]) {
                dst.copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

wire_float!(f32, f64);

impl sealed::Sealed for bool {}

impl Wire for bool {
    const WIDTH: usize = 1;

    fn decode(src: &[u8]) -> Result<Self> {
        let byte = u8::decode(src)?;
        Ok(byte != 0)
    }

    fn encode(self, dst: &mut [u8]) {
        (self as u8).encode(dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_round_trip_little_endian() {
        let mut buf = [0u8; 4];
        0xDEAD_BEEFu32.encode(&mut buf);
        assert_eq!(buf, [0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(u32::decode(&buf).unwrap(), 0xDEAD_BEEF);

        let mut buf = [0u8; 2];
        0x0102u16.encode(&mut buf);
        assert_eq!(buf, [0x02, 0x01]);
    }

    #[test]
    fn signed_round_trip() {
        let mut buf = [0u8; 8];
        (-42i64).encode(&mut buf);
        assert_eq!(i64::decode(&buf).unwrap(), -42);
    }

    #[test]
    fn floats_round_trip_bit_exact() {
        let mut buf = [0u8; 8];
        let value = -1234.5678f64;
        value.encode(&mut buf);
        assert_eq!(f64::decode(&buf).unwrap().to_bits(), value.to_bits());
    }

    #[test]
    fn infinite_float_rejected() {
        let mut buf = [0u8; 4];
        f32::INFINITY.encode(&mut buf);
        assert!(matches!(
            f32::decode(&buf),
            Err(ProtocolError::InvalidValue(_))
        ));

        let mut buf = [0u8; 8];
        f64::NEG_INFINITY.encode(&mut buf);
        assert!(f64::decode(&buf).is_err());
    }

    #[test]
    fn nan_still_decodes() {
        // NaN is odd but representable; only infinities are rejected.
        let mut buf = [0u8; 4];
        f32::NAN.encode(&mut buf);
        assert!(f32::decode(&buf).unwrap().is_nan());
    }

    #[test]
    fn bool_encodes_as_single_byte() {
        let mut buf = [0u8; 1];
        true.encode(&mut buf);
        assert_eq!(buf, [1]);
        assert!(bool::decode(&buf).unwrap());
        assert!(!bool::decode(&[0]).unwrap());
        assert!(bool::decode(&[7]).unwrap());
    }
}
