//! Coordinates as seen by the indexer: raw little-endian bits plus a precision

use crate::{
    error::{ArgumentError, Result},
    NumBits, MAX_PRECISION,
};

/// One coordinate of an indexed point
///
/// The coordinate's value is stored as a little-endian bit sequence: bit `i`
/// is bit `i % 8` of byte `i / 8`. Only the `width` low-order bits are part of
/// the coordinate, any higher bit of the storage is ignored.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point<'bytes> {
    bytes: &'bytes [u8],
    width: NumBits,
}
//
impl<'bytes> Point<'bytes> {
    /// Wrap `width` bits of coordinate storage
    ///
    /// Nothing is checked at this point, the indexer validates its whole input
    /// at once so that it can tell which axis is at fault.
    ///
    #[inline]
    pub const fn new(bytes: &'bytes [u8], width: NumBits) -> Self {
        Self { bytes, width }
    }

    /// Use every bit of `bytes` as coordinate bits
    #[inline]
    pub fn from_bytes(bytes: &'bytes [u8]) -> Self {
        let width = bytes
            .len()
            .checked_mul(8)
            .and_then(|bits| NumBits::try_from(bits).ok())
            .unwrap_or(NumBits::MAX);
        Self { bytes, width }
    }

    /// Coordinate storage
    #[inline]
    pub const fn bytes(&self) -> &'bytes [u8] {
        self.bytes
    }

    /// Number of bits of precision
    #[inline]
    pub const fn width(&self) -> NumBits {
        self.width
    }

    /// Number of bytes needed to hold `width` bits
    #[inline]
    pub const fn required_bytes(width: NumBits) -> usize {
        (width as usize + 7) / 8
    }

    /// Check that this is a valid coordinate for axis `axis`
    pub(crate) fn validate(&self, axis: usize) -> Result<(), ArgumentError> {
        if self.width == 0 || self.width > MAX_PRECISION {
            return Err(ArgumentError::Width {
                axis,
                width: self.width,
            });
        }
        let required = Self::required_bytes(self.width);
        if self.bytes.len() < required {
            return Err(ArgumentError::PointTooShort {
                axis,
                width: self.width,
                len: self.bytes.len(),
                required,
            });
        }
        Ok(())
    }

    /// Bit `level` of the coordinate, zero at or above the declared precision
    #[inline]
    pub(crate) fn bit(&self, level: NumBits) -> bool {
        level < self.width && crate::bits::bit_at_bytes(self.bytes, level as usize)
    }
}
