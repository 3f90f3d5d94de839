//! Fixed-size bit container used to accumulate indices wider than a word

use crate::{
    bits,
    error::{Error, Result},
    NumBits, Word,
};
use core::fmt;

/// Fixed-size little-endian bit buffer
///
/// Byte 0 holds the least significant bits, and significance increases with
/// the byte index. Within a byte, bit 0 is the least significant one.
///
/// The buffer only supports the handful of operations needed to grow an
/// integer from its most significant end: shifting everything left to open
/// new low-order bits, then filling them by OR-ing a word into the low-order
/// bytes. It never changes size after creation, so bits shifted out of the
/// highest byte are lost.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    bytes: Box<[u8]>,
}
//
impl BitBuffer {
    /// Minimal size of a buffer, so that a whole `Word` always fits in it
    pub const MIN_BYTES: usize = core::mem::size_of::<Word>();

    /// Allocate a zeroed buffer of `size_bytes` bytes (at least `MIN_BYTES`)
    pub fn new(size_bytes: usize) -> Self {
        Self {
            bytes: vec![0; size_bytes.max(Self::MIN_BYTES)].into_boxed_slice(),
        }
    }

    /// Like `new()`, but report allocation failure instead of aborting
    pub fn try_new(size_bytes: usize) -> Result<Self> {
        let size_bytes = size_bytes.max(Self::MIN_BYTES);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size_bytes)
            .map_err(|_| Error::AllocationFailure { bytes: size_bytes })?;
        bytes.resize(size_bytes, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Size of the buffer in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Buffers always hold at least `MIN_BYTES` bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bytes of the buffer, least significant first
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Turn the buffer into its bytes, least significant first
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Reset every bit to zero
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Shift the whole buffer left by less than one byte
    ///
    /// # Panics
    ///
    /// If `shift` is 8 or more. Use `shift_left_wide()` for larger shifts.
    ///
    pub fn shift_left(&mut self, shift: NumBits) {
        assert!(shift < 8, "Byte-wise shift by {} bits is not supported", shift);
        if shift == 0 {
            return;
        }

        // Each byte's high-order bits are carried into the next byte up
        let mut carry = 0;
        for byte in self.bytes.iter_mut() {
            let next_carry = *byte >> (8 - shift);
            *byte = (*byte << shift) | carry;
            carry = next_carry;
        }
    }

    /// Shift the whole buffer left by an arbitrary number of bits
    pub fn shift_left_wide(&mut self, mut shift: NumBits) {
        while shift > 0 {
            let step = shift.min(7);
            self.shift_left(step);
            shift -= step;
        }
    }

    /// Bitwise-OR a word into the least significant word of the buffer
    pub fn or_word(&mut self, word: Word) {
        for (byte, word_byte) in self.bytes.iter_mut().zip(word.to_le_bytes()) {
            *byte |= word_byte;
        }
    }

    /// Bitwise-XOR a word into the least significant word of the buffer
    pub fn xor_word(&mut self, word: Word) {
        for (byte, word_byte) in self.bytes.iter_mut().zip(word.to_le_bytes()) {
            *byte ^= word_byte;
        }
    }

    /// Set bit `pos` of the buffer to 1
    ///
    /// # Panics
    ///
    /// If `pos` is not lower than `8 * self.len()`.
    ///
    pub fn set_bit(&mut self, pos: usize) {
        self.bytes[pos / 8] |= 1 << (pos % 8);
    }

    /// Truth that bit `pos` of the buffer is set
    ///
    /// # Panics
    ///
    /// If `pos` is not lower than `8 * self.len()`.
    ///
    #[inline]
    pub fn bit(&self, pos: usize) -> bool {
        bits::bit_at_bytes(&self.bytes, pos)
    }

    /// Read the 64 least significant bits, if the buffer has that many
    pub fn to_word64(&self) -> Option<u64> {
        let low_bytes = self.bytes.get(..8)?;
        let mut word = [0; 8];
        word.copy_from_slice(low_bytes);
        Some(u64::from_le_bytes(word))
    }
}

// Bits are displayed most significant first, with an underscore between bytes
impl fmt::Binary for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, byte) in self.bytes.iter().rev().enumerate() {
            if idx > 0 {
                f.write_str("_")?;
            }
            write!(f, "{:08b}", byte)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for BitBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<BitBuffer> for Vec<u8> {
    fn from(buffer: BitBuffer) -> Self {
        buffer.into_bytes()
    }
}
