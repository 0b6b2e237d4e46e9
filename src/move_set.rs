//! A set of board coordinates packed one row per `u64`

use crate::{geometry::Pos, MAX_BOARD_SIZE};

/// Empty cells worth considering as the next move
///
/// Row `y` is stored as a bitmask in `rows[y]` with bit `x` set when `(x, y)`
/// is a member, so membership tests and updates are a single word operation
/// and a copy is a flat memcpy of at most [`MAX_BOARD_SIZE`] words.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PossibleMoveSet {
    size: usize,
    rows: [u64; MAX_BOARD_SIZE],
}

impl PossibleMoveSet {
    /// Creates an empty set for a `size`x`size` board
    pub fn new(size: usize) -> Self {
        debug_assert!(size <= MAX_BOARD_SIZE);
        Self {
            size,
            rows: [0; MAX_BOARD_SIZE],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.size && y < self.size);
        self.rows[y] |= 1 << x;
    }

    pub fn clear(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.size && y < self.size);
        self.rows[y] &= !(1 << x);
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && (self.rows[y] >> x) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.rows[..self.size]
            .iter()
            .map(|row| row.count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows[..self.size].iter().all(|&row| row == 0)
    }

    /// Members in row-major order; call again to restart
    pub fn iter(&self) -> Moves<'_> {
        Moves {
            rows: &self.rows[..self.size],
            y: 0,
            current: self.rows[0],
        }
    }
}

impl<'a> IntoIterator for &'a PossibleMoveSet {
    type Item = Pos;
    type IntoIter = Moves<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`PossibleMoveSet`]
pub struct Moves<'a> {
    rows: &'a [u64],
    y: usize,
    current: u64,
}

impl Iterator for Moves<'_> {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == 0 {
            self.y += 1;
            if self.y >= self.rows.len() {
                return None;
            }
            self.current = self.rows[self.y];
        }
        let x = self.current.trailing_zeros() as usize;
        // drop the lowest set bit
        self.current &= self.current - 1;
        Some((x, self.y))
    }
}
