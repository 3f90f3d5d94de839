//! Error types for Compact Hilbert index computations
//!
//! Every input is validated before any coordinate bit is read, so a computation
//! either produces a meaningful index or one of these errors.

use crate::NumBits;
use thiserror::Error;

/// Result type of fallible operations of this crate
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failure to compute a Compact Hilbert index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The indexed point does not describe a valid grid position
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),

    /// The output buffer could not be allocated
    #[error("Failed to allocate a {bytes}-byte index buffer")]
    AllocationFailure { bytes: usize },
}

/// Reason why an indexed point was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Number of dimensions outside of 1..=32
    #[error("Invalid dimension count: {0} (must be 1-32)")]
    DimensionCount(usize),

    /// Coordinates and bit widths were not supplied in equal numbers
    #[error("Got {points} coordinates but {widths} bit widths")]
    WidthCount { points: usize, widths: usize },

    /// Axis precision outside of 1..=32 bits
    #[error("Invalid width {width} for axis {axis} (must be 1-32 bits)")]
    Width { axis: usize, width: NumBits },

    /// Coordinate storage too short for the declared precision
    #[error("Coordinate of axis {axis} has {len} bytes, {required} are needed to hold {width} bits")]
    PointTooShort {
        axis: usize,
        width: NumBits,
        len: usize,
        required: usize,
    },
}

impl Error {
    /// Truth that this error reports invalid input, as opposed to a resource
    /// exhaustion issue
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
