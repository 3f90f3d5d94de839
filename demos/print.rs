//! Compact Hilbert curves in your terminal!
//!
//! Every point of a 2D grid is indexed, then the points are sorted by index
//! and the resulting path is drawn. This doubles as a visual check that the
//! curve only ever moves to a direct neighbor.

use compact_hilbert::{Indexer, NumBits, Word};

// Display the curve through a grid of 2^width_x by 2^width_y points
fn print_curve(width_x: NumBits, width_y: NumBits) {
    // Print header
    println!("--- At widths {width_x}x{width_y} ---\n");

    // Order the grid's points along the curve
    let (range_x, range_y) = (1usize << width_x, 1usize << width_y);
    let num_points = range_x * range_y;
    let indexer = Indexer::new();
    let mut indexed = (0..num_points)
        .map(|point| {
            let coords = [(point % range_x) as Word, (point / range_x) as Word];
            let index = indexer
                .index_words(&coords, &[width_x, width_y])
                .expect("Grid points are valid input");
            (index.into_bytes(), coords)
        })
        .collect::<Vec<_>>();
    // Indices are little-endian, compare them from the most significant byte
    indexed.sort_by(|(a, _), (b, _)| a.iter().rev().cmp(b.iter().rev()));
    let coordinates = indexed
        .into_iter()
        .map(|(_, coords)| coords)
        .collect::<Vec<_>>();

    // Set up a 2D character-based display
    let mut display = (0..(num_points + range_y))
        .map(|idx| {
            if idx % (range_x + 1) == range_x {
                '\n'
            } else {
                // This character is a placeholder that should not persist in
                // the final program output.
                '@'
            }
        })
        .collect::<Vec<_>>();
    let to_index = |coords: [Word; 2]| (coords[1] as usize) * (range_x + 1) + (coords[0] as usize);
    let to_dir = |src: [Word; 2], dst: [Word; 2]| {
        [
            dst[0] as isize - src[0] as isize,
            dst[1] as isize - src[1] as isize,
        ]
    };

    // Draw the start of the curve
    let start = coordinates[0];
    let next = coordinates[1];
    display[to_index(start)] = match to_dir(start, next) {
        [0, -1] => '┴',
        [1, 0] => '├',
        [0, 1] => '┬',
        [-1, 0] => '┤',
        _ => '*',
    };

    // Draw the end of the curve
    let end = coordinates[num_points - 1];
    let prev = coordinates[num_points - 2];
    display[to_index(end)] = match to_dir(prev, end) {
        [0, -1] => '^',
        [1, 0] => '>',
        [0, 1] => 'v',
        [-1, 0] => '<',
        _ => '*',
    };

    // Draw the middle of the curve, compact curves through non-square grids
    // may jump between some of their points.
    for window in coordinates.windows(3) {
        let path = match (to_dir(window[0], window[1]), to_dir(window[1], window[2])) {
            ([-1, 0], [0, -1]) | ([0, 1], [1, 0]) => '└',
            ([-1, 0], [0, 1]) | ([0, -1], [1, 0]) => '┌',
            ([1, 0], [1, 0]) | ([-1, 0], [-1, 0]) => '─',
            ([1, 0], [0, -1]) | ([0, 1], [-1, 0]) => '┘',
            ([0, 1], [0, 1]) | ([0, -1], [0, -1]) => '│',
            ([1, 0], [0, 1]) | ([0, -1], [-1, 0]) => '┐',
            _ => '*',
        };
        display[to_index(window[1])] = path;
    }

    // Display the curve
    let display_string = display.into_iter().collect::<String>();
    println!("{display_string}");
}

// Display a few square and rectangular curves
fn main() {
    println!();
    for order in 1..=5 {
        print_curve(order, order);
    }
    print_curve(5, 3);
    print_curve(3, 5);
}
