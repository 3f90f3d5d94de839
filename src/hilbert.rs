//! Compact Hilbert index computation
//!
//! This follows the "Compact Hilbert Indices" algorithm by Chris Hamilton
//! (ref: CS-2006-07). A Hilbert curve through an n-dimensional grid whose axes
//! are m bits wide can be built recursively: the grid is cut in 2^n sub-cubes
//! by the most significant bit of each coordinate, the curve visits these
//! sub-cubes in the order of a Gray code walk through the corners of an
//! n-cube, and each sub-cube is then filled by a rotated and reflected copy of
//! the whole curve, chosen so that consecutive sub-curves join up.
//!
//! Computing the index of a point thus means walking down the levels of this
//! recursion from the most significant coordinate bits, while tracking the
//! rotation (direction `d`) and reflection (entry point `e`) of the current
//! sub-curve. The compact variant additionally skips the axes that have run
//! out of precision at a given level, so that the index is only as wide as
//! the sum of the axis precisions.

use crate::{
    bits,
    buffer::BitBuffer,
    error::{ArgumentError, Result},
    point::Point,
    rank, NumBits, Word, MAX_DIMENSIONS,
};
use tracing::{debug, trace};

/// Corner of the n-cube at which the sub-curve number `i` enters its sub-cube
///
/// This is computed with wrapping 32-bit arithmetic, which is observable for
/// inputs whose top bit is set, such as `-2i32 as Word`.
///
#[inline]
pub const fn entry(i: Word) -> Word {
    if i == 0 {
        0
    } else {
        bits::gray_code((i.wrapping_sub(1) / 2).wrapping_mul(2))
    }
}

/// Axis along which the sub-curve number `i` leaves its sub-cube, in `n` dims
///
/// This counts all set bits of the neighbouring odd number.
///
#[inline]
pub const fn direction(i: Word, n: NumBits) -> NumBits {
    if i == 0 {
        0
    } else if i % 2 == 0 {
        bits::popcount(i - 1) % n
    } else {
        bits::popcount(i) % n
    }
}

/// Variant of `direction()` which counts trailing set bits instead of all set
/// bits, as in the paper's definition of intra-sub-cube directions
#[inline]
pub const fn direction_trailing_ones(i: Word, n: NumBits) -> NumBits {
    if i == 0 {
        0
    } else if i % 2 == 0 {
        (i - 1).trailing_ones() % n
    } else {
        i.trailing_ones() % n
    }
}

/// Rule used to pick the direction of the next sub-curve
///
/// Both rules agree in one and two dimensions, and both produce a bijection
/// between grid points and indices. Only `TrailingOnes` keeps consecutive
/// indices of an equal-width grid at unit distance in three or more
/// dimensions, but `SetBits` is the default as existing indices were built
/// with it.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirectionRule {
    /// Use `direction()`
    #[default]
    SetBits,

    /// Use `direction_trailing_ones()`
    TrailingOnes,
}
//
impl DirectionRule {
    /// Direction of the next sub-curve after sub-curve `i` in `n` dimensions
    #[inline]
    pub const fn direction(self, i: Word, n: NumBits) -> NumBits {
        match self {
            Self::SetBits => direction(i, n),
            Self::TrailingOnes => direction_trailing_ones(i, n),
        }
    }
}

/// Compact Hilbert index calculator
///
/// This only carries configuration, so it is cheap to copy and can be shared
/// freely between threads. Each computation owns its state and output buffer.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Indexer {
    direction_rule: DirectionRule,
}
//
impl Indexer {
    /// Set up an indexer with the default configuration
    pub const fn new() -> Self {
        Self {
            direction_rule: DirectionRule::SetBits,
        }
    }

    /// Pick the rule used to orient sub-curves
    pub const fn with_direction_rule(mut self, direction_rule: DirectionRule) -> Self {
        self.direction_rule = direction_rule;
        self
    }

    /// Rule used to orient sub-curves
    pub const fn direction_rule(&self) -> DirectionRule {
        self.direction_rule
    }

    /// Compute the index of a point given as one byte sequence per axis
    ///
    /// `widths[i]` is the number of bits of precision of `points[i]`, whose
    /// bits are read in little-endian order. The resulting buffer is
    /// `ceil(widths.iter().sum() / 8)` bytes long, or 4 bytes if that is more.
    ///
    pub fn compute_index(&self, points: &[&[u8]], widths: &[NumBits]) -> Result<BitBuffer> {
        if points.len() != widths.len() {
            debug!(
                points = points.len(),
                widths = widths.len(),
                "Rejected point with mismatched widths"
            );
            return Err(ArgumentError::WidthCount {
                points: points.len(),
                widths: widths.len(),
            }
            .into());
        }
        let points = points
            .iter()
            .zip(widths)
            .map(|(&bytes, &width)| Point::new(bytes, width))
            .collect::<Vec<_>>();
        self.index_points(&points)
    }

    /// Compute the index of a point whose coordinates are native words
    pub fn index_words(&self, coords: &[Word], widths: &[NumBits]) -> Result<BitBuffer> {
        let storage = coords.iter().map(|coord| coord.to_le_bytes()).collect::<Vec<_>>();
        let points = storage.iter().map(|bytes| &bytes[..]).collect::<Vec<_>>();
        self.compute_index(&points, widths)
    }

    /// Compute the index of a point
    pub fn index_points(&self, points: &[Point<'_>]) -> Result<BitBuffer> {
        let layout = Layout::new(points).map_err(|e| {
            debug!(error = %e, "Rejected invalid point");
            e
        })?;
        let mut index = BitBuffer::try_new(layout.num_bytes())?;
        debug!(
            dimensions = layout.dimensions,
            total_bits = layout.total_bits,
            depth = layout.depth,
            rule = ?self.direction_rule,
            "Computing compact Hilbert index"
        );

        let widths = points.iter().map(Point::width).collect::<Vec<_>>();
        let n = layout.dimensions as NumBits;
        let mut entry_point: Word = 0;
        let mut dir: NumBits = 0;
        for level in (0..layout.depth).rev() {
            // Axes that still have bits at this level
            let mask = rank::extract_mask(&widths, level, dir as usize) as Word;

            // Cross-section of all coordinates at this level
            let mut corner: Word = 0;
            for (axis, point) in points.iter().enumerate().rev() {
                corner |= (point.bit(level) as Word) << axis;
            }

            // Bring the corner into the frame of the current sub-curve, find
            // which sub-cube of the Gray code walk it is, and keep the bits of
            // that sub-cube number which belong to active axes.
            let transformed = bits::rotate_right_in(corner ^ entry_point, dir, n);
            let sub_cube = bits::inverse_gray_code(transformed);
            let rank = rank::gray_code_rank(n, mask, sub_cube);
            index.shift_left_wide(bits::popcount(mask));
            index.or_word(rank);
            trace!(
                level,
                mask,
                corner,
                sub_cube,
                rank,
                entry_point,
                dir,
                "Ranked level"
            );

            // Orient the sub-curve of the next level
            entry_point ^= bits::rotate_left_in(entry(sub_cube), dir, n);
            dir = (dir + self.direction_rule.direction(sub_cube, n) + 1) % n;
        }
        Ok(index)
    }
}

/// Compute the index of a point with the default `Indexer` configuration
///
/// See `Indexer::compute_index()` for details.
///
pub fn compute_index(points: &[&[u8]], widths: &[NumBits]) -> Result<BitBuffer> {
    Indexer::new().compute_index(points, widths)
}

/// Shape of the index of a validated point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Layout {
    /// Number of coordinates (n)
    dimensions: usize,

    /// Sum of the axis precisions (M)
    total_bits: usize,

    /// Largest axis precision (m)
    depth: NumBits,
}
//
impl Layout {
    /// Validate a point and compute its index layout
    fn new(points: &[Point<'_>]) -> Result<Self, ArgumentError> {
        let dimensions = points.len();
        if dimensions == 0 || dimensions > MAX_DIMENSIONS {
            return Err(ArgumentError::DimensionCount(dimensions));
        }
        let mut total_bits = 0;
        let mut depth: NumBits = 0;
        for (axis, point) in points.iter().enumerate() {
            point.validate(axis)?;
            total_bits += point.width() as usize;
            depth = depth.max(point.width());
        }
        Ok(Self {
            dimensions,
            total_bits,
            depth,
        })
    }

    /// Number of bytes needed to store the index
    fn num_bytes(&self) -> usize {
        (self.total_bits + 7) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bits::test_utils::*, Error};
    use std::collections::HashMap;

    #[test]
    fn entry() {
        assert_eq!(super::entry(-2i32 as Word), 2147483650);
        assert_eq!(super::entry(6), 6);
        assert_eq!(super::entry(-6i32 as Word), 2147483652);
        assert_eq!(super::entry(2), 0);
        assert_eq!(super::entry(4), 3);
        assert_eq!(super::entry(0), 0);
    }

    #[test]
    fn direction() {
        assert_eq!(super::direction(0, 3), 0);
        assert_eq!(super::direction(1, 3), 1);
        assert_eq!(super::direction(2, 3), 1);
        assert_eq!(super::direction(3, 3), 2);
        assert_eq!(super::direction(5, 3), 2);
        assert_eq!(super::direction(7, 3), 0);
        assert_eq!(super::direction(0b1011, 5), 3);
        assert_eq!(super::direction(Word::MAX, 32), 0);
    }

    #[test]
    fn direction_trailing_ones() {
        assert_eq!(super::direction_trailing_ones(0, 3), 0);
        assert_eq!(super::direction_trailing_ones(1, 3), 1);
        assert_eq!(super::direction_trailing_ones(2, 3), 1);
        assert_eq!(super::direction_trailing_ones(3, 3), 2);
        assert_eq!(super::direction_trailing_ones(5, 3), 1);
        assert_eq!(super::direction_trailing_ones(6, 3), 1);
        assert_eq!(super::direction_trailing_ones(7, 3), 0);
        assert_eq!(super::direction_trailing_ones(0b1011, 5), 2);
    }

    #[test]
    fn rules_agree_in_2d() {
        for i in 0..4 {
            assert_eq!(super::direction(i, 2), super::direction_trailing_ones(i, 2));
        }
    }

    #[test]
    fn indexer_config() {
        assert_eq!(Indexer::default(), Indexer::new());
        assert_eq!(Indexer::new().direction_rule(), DirectionRule::SetBits);
        assert_eq!(
            Indexer::new()
                .with_direction_rule(DirectionRule::TrailingOnes)
                .direction_rule(),
            DirectionRule::TrailingOnes
        );
    }

    // Position of a point on the ]-shaped 2D Hilbert curve, computed by
    // walking through the curve's 16-bit index one pair of bits at a time and
    // tracking the coordinate swaps and inversions of the current sub-curve.
    fn reference_decode_2d(code: u16) -> [u8; 2] {
        let mut input_buf = code.reverse_bits();
        let mut results = [0u8; 2];
        let mut swap = false;
        let mut invert = false;
        for _level in 0..8 {
            let high_order_bit = pop_bit(&mut input_buf);
            let low_order_bit = pop_bit(&mut input_buf);
            let mut x_bit = high_order_bit ^ low_order_bit;
            let mut y_bit = high_order_bit;
            if swap {
                core::mem::swap(&mut x_bit, &mut y_bit);
            }
            push_bit(&mut results[0], x_bit ^ invert);
            push_bit(&mut results[1], y_bit ^ invert);
            swap ^= !(high_order_bit ^ low_order_bit);
            invert ^= high_order_bit & low_order_bit;
        }
        results
    }

    #[test]
    fn matches_reference_2d() {
        for code in u16::MIN..=u16::MAX {
            let [x, y] = reference_decode_2d(code);
            let index = compute_index(&[&[x], &[y]], &[8, 8]).unwrap();
            assert_eq!(
                index.as_bytes(),
                &[code as u8, (code >> 8) as u8, 0, 0],
                "Unexpected index for point ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn known_indices() {
        fn check(indexer: Indexer, coords: &[Word], widths: &[NumBits], expected: &[u8]) {
            assert_eq!(
                indexer.index_words(coords, widths).unwrap().as_bytes(),
                expected,
                "Unexpected index for {:?} with widths {:?}",
                coords,
                widths
            );
        }
        let set_bits = Indexer::new();
        let trailing_ones = set_bits.with_direction_rule(DirectionRule::TrailingOnes);

        check(set_bits, &[0, 0], &[8, 8], &[0, 0, 0, 0]);
        check(set_bits, &[1, 0], &[8, 8], &[3, 0, 0, 0]);
        check(set_bits, &[0, 1], &[8, 8], &[1, 0, 0, 0]);
        check(set_bits, &[3, 5], &[8, 8], &[0x1c, 0, 0, 0]);
        check(set_bits, &[255, 255], &[8, 8], &[0xaa, 0xaa, 0, 0]);
        check(set_bits, &[128, 0], &[8, 8], &[0x00, 0x40, 0, 0]);
        check(set_bits, &[0, 128], &[8, 8], &[0xaa, 0xea, 0, 0]);
        check(
            set_bits,
            &[0xDEAD_BEEF, 0x1234_5678],
            &[32, 32],
            &[0x15, 0xc1, 0x68, 0x76, 0xc9, 0x49, 0xf8, 0x52],
        );
        check(set_bits, &[Word::MAX, Word::MAX], &[32, 32], &[0xaa; 8]);
        for indexer in [set_bits, trailing_ones] {
            check(indexer, &[5, 9, 14], &[4, 4, 4], &[0x3a, 0x09, 0, 0]);
            check(indexer, &[3000, 5, 100], &[12, 3, 7], &[0x81, 0x9e, 0x2d, 0]);
        }
        check(set_bits, &[1, 2, 3, 4, 250], &[8; 5], &[0xa6, 0xbe, 0xff, 0xff, 0xff]);
        check(trailing_ones, &[1, 2, 3, 4, 250], &[8; 5], &[0xb8, 0xbe, 0xff, 0xff, 0xff]);
        let alternating = (0..32).map(|axis| axis % 2).collect::<Vec<Word>>();
        check(set_bits, &alternating, &[1; 32], &[0xcc; 4]);
    }

    #[test]
    fn to_word64() {
        let index = Indexer::new()
            .index_words(&[0xDEAD_BEEF, 0x1234_5678], &[32, 32])
            .unwrap();
        assert_eq!(index.to_word64(), Some(0x52f8_49c9_7668_c115));
    }

    #[test]
    fn buffer_size() {
        fn size(widths: &[NumBits]) -> usize {
            let coords = vec![0; widths.len()];
            Indexer::new().index_words(&coords, widths).unwrap().len()
        }
        assert_eq!(size(&[1]), 4);
        assert_eq!(size(&[3, 2]), 4);
        assert_eq!(size(&[8, 8, 8, 8]), 4);
        assert_eq!(size(&[8, 8, 8, 8, 8]), 5);
        assert_eq!(size(&[8, 8, 8, 8, 1]), 5);
        assert_eq!(size(&[32, 32, 32]), 12);
        assert_eq!(size(&[32; 32]), 128);
    }

    #[test]
    fn ignores_bits_above_width() {
        let clean = compute_index(&[&[0b0000_0101], &[0b0000_0010]], &[3, 2]).unwrap();
        let dirty = compute_index(&[&[0b1111_1101], &[0b1010_1110]], &[3, 2]).unwrap();
        assert_eq!(clean, dirty);
    }

    #[test]
    fn from_bytes_points() {
        let x = [200u8];
        let y = [17u8];
        let index = Indexer::new()
            .index_points(&[Point::from_bytes(&x), Point::from_bytes(&y)])
            .unwrap();
        assert_eq!(index, compute_index(&[&x, &y], &[8, 8]).unwrap());
        assert_eq!(index.as_bytes(), &[0xe9, 0x51, 0, 0]);
    }

    #[test]
    fn invalid_arguments() {
        let indexer = Indexer::new();
        assert_eq!(
            indexer.compute_index(&[], &[]),
            Err(Error::InvalidArgument(ArgumentError::DimensionCount(0)))
        );
        assert_eq!(
            indexer.index_words(&[0; 33], &[1; 33]),
            Err(Error::InvalidArgument(ArgumentError::DimensionCount(33)))
        );
        assert_eq!(
            indexer.compute_index(&[&[0], &[0]], &[8]),
            Err(Error::InvalidArgument(ArgumentError::WidthCount {
                points: 2,
                widths: 1
            }))
        );
        assert_eq!(
            indexer.index_words(&[0, 0], &[8, 0]),
            Err(Error::InvalidArgument(ArgumentError::Width { axis: 1, width: 0 }))
        );
        assert_eq!(
            indexer.index_words(&[0, 0], &[33, 8]),
            Err(Error::InvalidArgument(ArgumentError::Width { axis: 0, width: 33 }))
        );
        assert_eq!(
            indexer.compute_index(&[&[0], &[0], &[0, 0]], &[8, 12, 12]),
            Err(Error::InvalidArgument(ArgumentError::PointTooShort {
                axis: 1,
                width: 12,
                len: 1,
                required: 2
            }))
        );
        assert_eq!(
            indexer.index_points(&[Point::from_bytes(&[0; 5])]),
            Err(Error::InvalidArgument(ArgumentError::Width { axis: 0, width: 40 }))
        );
    }

    // Compute the index of every point of a grid, as an integer
    fn index_grid(indexer: Indexer, widths: &[NumBits]) -> HashMap<u128, Vec<Word>> {
        let mut grid = HashMap::new();
        let mut coords = vec![0 as Word; widths.len()];
        'points: loop {
            let index = indexer.index_words(&coords, widths).unwrap();
            let mut bytes = [0; 16];
            bytes[..index.len()].copy_from_slice(index.as_bytes());
            let previous = grid.insert(u128::from_le_bytes(bytes), coords.clone());
            assert_eq!(previous, None, "Duplicate index for widths {:?}", widths);

            // Move to the next point of the grid, odometer-style
            for (coord, &width) in coords.iter_mut().zip(widths) {
                *coord += 1;
                if *coord < (1 << width) {
                    continue 'points;
                }
                *coord = 0;
            }
            break grid;
        }
    }

    fn check_bijective(indexer: Indexer, widths: &[NumBits]) -> HashMap<u128, Vec<Word>> {
        let grid = index_grid(indexer, widths);
        let total_bits = widths.iter().sum::<NumBits>();
        assert_eq!(grid.len() as u128, 1 << total_bits);
        assert!(
            grid.keys().all(|&index| index < (1 << total_bits)),
            "Index out of range for widths {:?}",
            widths
        );
        grid
    }

    fn check_unit_steps(indexer: Indexer, widths: &[NumBits]) {
        let grid = check_bijective(indexer, widths);
        for index in 1..(grid.len() as u128) {
            let distance = grid[&(index - 1)]
                .iter()
                .zip(&grid[&index])
                .map(|(&a, &b)| (a as i64 - b as i64).abs())
                .sum::<i64>();
            assert_eq!(
                distance, 1,
                "Jump between indices {} and {} for widths {:?}",
                index - 1,
                index,
                widths
            );
        }
    }

    #[test]
    fn bijective() {
        let trailing_ones = Indexer::new().with_direction_rule(DirectionRule::TrailingOnes);
        for indexer in [Indexer::new(), trailing_ones] {
            for widths in [
                &[5][..],
                &[3, 2],
                &[2, 3],
                &[4, 1],
                &[5, 3],
                &[3, 2, 1],
                &[3, 3, 3],
                &[4, 4, 4],
                &[1, 1, 1, 1],
                &[2, 2, 2, 2],
                &[1, 2, 1, 2, 1, 2],
            ] {
                check_bijective(indexer, widths);
            }
        }
    }

    #[test]
    fn unit_steps_2d() {
        for rule in [DirectionRule::SetBits, DirectionRule::TrailingOnes] {
            let indexer = Indexer::new().with_direction_rule(rule);
            for width in 1..=6 {
                check_unit_steps(indexer, &[width, width]);
            }
            check_unit_steps(indexer, &[3, 2]);
        }
    }

    #[test]
    fn unit_steps_nd() {
        let indexer = Indexer::new().with_direction_rule(DirectionRule::TrailingOnes);
        for widths in [&[2, 2, 2][..], &[3, 3, 3], &[4, 4, 4], &[2, 2, 2, 2], &[1; 6]] {
            check_unit_steps(indexer, widths);
        }
    }

    // Exploring the whole 2^24-point grid is too slow in debug mode
    #[test]
    #[ignore]
    fn unit_steps_2d_exhaustive() {
        check_unit_steps(Indexer::new(), &[12, 12]);
    }

    #[test]
    fn deterministic_and_thread_safe() {
        let widths = [12, 3, 7, 32];
        let coords = [3000, 5, 100, 0xDEAD_BEEF];
        let expected = Indexer::new().index_words(&coords, &widths).unwrap();
        std::thread::scope(|scope| {
            let workers = (0..8)
                .map(|worker| {
                    let (expected, coords, widths) = (&expected, &coords, &widths);
                    scope.spawn(move || {
                        for iter in 0..1000 {
                            // Interleave with unrelated computations
                            let other = [worker, iter, 0, 1];
                            Indexer::new().index_words(&other, widths).unwrap();
                            assert_eq!(&Indexer::new().index_words(coords, widths).unwrap(), expected);
                        }
                    })
                })
                .collect::<Vec<_>>();
            for worker in workers {
                worker.join().unwrap();
            }
        });
    }
}
