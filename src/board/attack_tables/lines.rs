//! Between- and line-masks for every ordered pair of squares.
//!
//! `BETWEEN[a][b]` is the set of squares strictly between `a` and `b` when
//! they share a rank, file, or diagonal (empty otherwise). `LINE[a][b]` is
//! the full line through both squares, extended to the board edges, used to
//! restrict a pinned piece's destinations to its pin ray.

use std::sync::LazyLock;

const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn ray(from: usize, dir: (isize, isize)) -> Vec<usize> {
    let mut squares = Vec::new();
    let mut rank = (from / 8) as isize + dir.0;
    let mut file = (from % 8) as isize + dir.1;
    while (0..8).contains(&rank) && (0..8).contains(&file) {
        squares.push((rank * 8 + file) as usize);
        rank += dir.0;
        file += dir.1;
    }
    squares
}

pub(crate) static BETWEEN: LazyLock<[[u64; 64]; 64]> = LazyLock::new(|| {
    let mut table = [[0u64; 64]; 64];
    for a in 0..64 {
        for &dir in &DIRECTIONS {
            let mut mask = 0u64;
            for sq in ray(a, dir) {
                table[a][sq] = mask;
                mask |= 1u64 << sq;
            }
        }
    }
    table
});

pub(crate) static LINE: LazyLock<[[u64; 64]; 64]> = LazyLock::new(|| {
    let mut table = [[0u64; 64]; 64];
    for a in 0..64 {
        for &dir in &DIRECTIONS {
            let forward = ray(a, dir);
            if forward.is_empty() {
                continue;
            }
            let backward = ray(a, (-dir.0, -dir.1));
            let mut full = 1u64 << a;
            for &sq in forward.iter().chain(backward.iter()) {
                full |= 1u64 << sq;
            }
            for &sq in &forward {
                table[a][sq] = full;
            }
        }
    }
    table
});

/// Squares strictly between `a` and `b`, or an empty mask if not aligned.
#[inline]
pub(crate) fn between(a: usize, b: usize) -> u64 {
    BETWEEN[a][b]
}

/// The full line through `a` and `b` (both endpoints plus every square
/// beyond them out to the board edge), or an empty mask if not aligned.
#[inline]
pub(crate) fn line_through(a: usize, b: usize) -> u64 {
    LINE[a][b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_same_rank() {
        // a1 = 0, h1 = 7
        assert_eq!(between(0, 7), 0b0111_1110);
    }

    #[test]
    fn between_unaligned_is_empty() {
        // a1 = 0, b3 = 17 (knight's move, not aligned)
        assert_eq!(between(0, 17), 0);
    }

    #[test]
    fn line_through_diagonal() {
        // a1 = 0, h8 = 63, full a1-h8 diagonal
        let l = line_through(0, 63);
        for sq in [0, 9, 18, 27, 36, 45, 54, 63] {
            assert!(l & (1u64 << sq) != 0, "square {sq} should be on the diagonal");
        }
        assert!(l & (1u64 << 1) == 0);
    }
}
