//! Board geometry: cells, knight directions and distances

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board dimensions
pub const DEFAULT_WIDTH: u8 = 7;
pub const DEFAULT_HEIGHT: u8 = 7;

/// Cells are tracked in a `u64` bitboard
pub const MAX_CELLS: usize = 64;

/// A target cell, `(row, col)`.
///
/// Ordering is lexicographic on `(row, col)`, which is the order the search
/// engines visit moves in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Move {
    pub row: i8,
    pub col: i8,
}

impl Move {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Cell reached by stepping `(dr, dc)`
    pub fn offset(&self, dr: i8, dc: i8) -> Move {
        Move::new(self.row + dr, self.col + dc)
    }

    /// Sum of both coordinates
    pub fn coord_sum(&self) -> i32 {
        self.row as i32 + self.col as i32
    }

    /// Manhattan distance between two cells
    pub fn manhattan_distance(&self, other: Move) -> i32 {
        (self.row as i32 - other.row as i32).abs() + (self.col as i32 - other.col as i32).abs()
    }

    /// Euclidean distance between two cells
    pub fn euclidean_distance(&self, other: Move) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl From<(i8, i8)> for Move {
    fn from((row, col): (i8, i8)) -> Self {
        Move::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Knight-move offsets (dr, dc)
pub const KNIGHT_DIRECTIONS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
