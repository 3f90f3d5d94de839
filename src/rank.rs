//! Masks of the axes that are still active at a given precision level, and
//! extraction of the corresponding bits from a transformed Hilbert word

use crate::{bits, NumBits, Word};

/// Compute which axes still carry bits at precision level `level`
///
/// Bit `j` of the result is set when the axis `(j + d) % n` is more than
/// `level` bits wide, `n` being `widths.len()`. Rotating the axes by `d`
/// this way keeps the mask aligned with the Hilbert word, which is rotated
/// by the current direction before its bits are ranked.
///
pub fn extract_mask(widths: &[NumBits], level: NumBits, d: usize) -> u64 {
    let n = widths.len();
    let mut mask = 0;
    for j in (0..n).rev() {
        mask <<= 1;
        if widths[(j + d) % n] > level {
            mask |= 1;
        }
    }
    mask
}

/// Compute the Gray code rank of `w` with respect to the axis mask `mask`
///
/// Only the bits of `w` whose position is set in `mask` are kept, and they
/// are packed together in the low-order bits of the result, preserving their
/// relative order. Only the `n` low-order bits of `mask` are considered.
///
pub const fn gray_code_rank(n: NumBits, mask: Word, w: Word) -> Word {
    let mut rank = 0;
    let mut j = n;
    while j > 0 {
        j -= 1;
        if bits::bit_at_word(mask, j) {
            rank = (rank << 1) | bits::bit_at_word(w, j) as Word;
        }
    }
    rank
}
