//! Binary arithmetic utilities used for Hilbert index computations

use crate::{NumBits, Word};

/// Count the number of bits of an integer
#[inline(always)]
pub const fn num_bits<T>() -> NumBits {
    // TODO: Once assert in const is allowed, sanity check input
    // assert!(core::mem::size_of<T>() <= NumBits::MAX as usize);
    (core::mem::size_of::<T>() * 8) as _
}

/// Generate a mask that selects a certain number of low-order bits: 0000...0011
#[inline(always)]
pub const fn low_order_mask(length: NumBits) -> Word {
    if length < num_bits::<Word>() {
        (1 << length) - 1
    } else {
        Word::MAX
    }
}

/// Compute the reflected binary Gray code of an integer
///
/// Consecutive integers have Gray codes that differ by exactly one bit, which
/// is what makes a walk through the corners of a hypercube in Gray code order
/// never jump across the hypercube.
///
#[inline(always)]
pub const fn gray_code(i: Word) -> Word {
    i ^ (i >> 1)
}

/// Invert `gray_code()`
///
/// Bit k of the result is the XOR of all bits of the Gray code at positions
/// k and above, which is a left-to-right inclusive XOR scan of its bits.
///
#[inline(always)]
pub const fn inverse_gray_code(mut bits: Word) -> Word {
    // This is a bitwise implementation of the Hillis/Steele parallel inclusive
    // scan algorithm, which needs log2(32) steps instead of 31 shifts.
    let mut stride = 1;
    while stride < num_bits::<Word>() {
        // Iteration 0: [ g1     g2        g3           g4           g5 ... ]
        // Iteration 1: [ g1  g1^g2     g2^g3        g3^g4        g4^g5 ... ]
        // Iteration 2: [ g1  g1^g2  g1^g2^g3  g1^g2^g3^g4  g2^g3^g4^g5 ... ]
        bits ^= bits >> stride;
        stride *= 2;
    }
    bits
}

/// Rotate a word to the left by `shift` bits
#[inline(always)]
pub const fn rotate_left(value: Word, shift: NumBits) -> Word {
    value.rotate_left(shift)
}

/// Rotate a word to the right by `shift` bits
#[inline(always)]
pub const fn rotate_right(value: Word, shift: NumBits) -> Word {
    value.rotate_right(shift)
}

/// Rotate the low `width` bits of a word to the left by `shift` bits
///
/// Bits at positions `width` and above are discarded. `shift` must be lower
/// than `width`, and `width` must lie within 1..=32.
///
#[inline(always)]
pub const fn rotate_left_in(value: Word, shift: NumBits, width: NumBits) -> Word {
    debug_assert!(width >= 1 && width <= num_bits::<Word>() && shift < width);
    let mask = low_order_mask(width);
    let value = value & mask;
    if shift == 0 {
        value
    } else {
        ((value << shift) | (value >> (width - shift))) & mask
    }
}

/// Rotate the low `width` bits of a word to the right by `shift` bits
///
/// Same contract as `rotate_left_in()`.
///
#[inline(always)]
pub const fn rotate_right_in(value: Word, shift: NumBits, width: NumBits) -> Word {
    debug_assert!(width >= 1 && width <= num_bits::<Word>() && shift < width);
    let mask = low_order_mask(width);
    let value = value & mask;
    if shift == 0 {
        value
    } else {
        ((value >> shift) | (value << (width - shift))) & mask
    }
}

/// Extract bit `index` of a word, 0 being the least significant bit
#[inline(always)]
pub const fn bit_at_word(value: Word, index: NumBits) -> bool {
    (value >> index) & 1 == 1
}

/// Extract bit `index` of a little-endian byte sequence
///
/// Bit `index` lives in byte `index / 8`, at position `index % 8` within that
/// byte. This lets coordinates be stored with more bits than a `Word` holds.
///
/// # Panics
///
/// If `bytes` is shorter than `index / 8 + 1` bytes.
///
#[inline(always)]
pub fn bit_at_bytes(bytes: &[u8], index: usize) -> bool {
    (bytes[index / 8] >> (index % 8)) & 1 == 1
}

/// Count the bits of a word that are set
#[inline(always)]
pub const fn popcount(value: Word) -> NumBits {
    value.count_ones()
}
