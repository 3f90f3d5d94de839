//! Compact Hilbert indices for points with unequal per-axis precision
//!
//! A Hilbert curve maps a multi-dimensional grid onto a line without ever
//! jumping across space, which makes curve indices good one-dimensional sort
//! keys for multi-dimensional data. The "Compact Hilbert Indices" paper by
//! Chris Hamilton (ref: CS-2006-07) extends this to grids whose axes do not
//! all have the same number of bits, producing an index that is exactly as
//! wide as the sum of the axis precisions.
//!
//! Such an index can easily get wider than a machine word, so it is
//! accumulated into a [`BitBuffer`]:
//!
//! ```
//! let x = [200u8];
//! let y = [17u8];
//! let index = compact_hilbert::compute_index(&[&x, &y], &[8, 8]).unwrap();
//! assert_eq!(index.as_bytes(), &[0xe9, 0x51, 0x00, 0x00]);
//! ```

pub mod bits;
pub mod buffer;
pub mod error;
pub mod hilbert;
pub mod point;
pub mod rank;

pub use crate::{
    buffer::BitBuffer,
    error::{ArgumentError, Error, Result},
    hilbert::{compute_index, DirectionRule, Indexer},
    point::Point,
};

/// Integer type suitable for counting number of bits
///
/// Although 32-bit is very much overkill for this purpose, I am using this type
/// for interface compatibility with standard Rust integer methods.
///
pub type NumBits = u32;

/// Machine word on which the per-level Hilbert transforms operate
///
/// Every level of the algorithm handles one bit per axis, so the word width
/// bounds the number of dimensions. It also bounds the precision of a single
/// axis, as the word-based entry points read coordinates from such words.
///
pub type Word = u32;

/// Maximal number of dimensions of an indexed point
pub const MAX_DIMENSIONS: usize = bits::num_bits::<Word>() as usize;

/// Maximal number of bits of precision along one axis
pub const MAX_PRECISION: NumBits = bits::num_bits::<Word>();
