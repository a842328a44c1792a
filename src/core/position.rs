//! Board squares

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A square on the board as `(row, col)`, 0-indexed
///
/// Coordinates are signed so that knight offsets can be applied before the
/// result is bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Absolute row/column displacement to another square
    #[inline]
    pub fn delta(self, other: Position) -> (i32, i32) {
        ((self.row - other.row).abs(), (self.col - other.col).abs())
    }
}

impl Add<(i32, i32)> for Position {
    type Output = Position;

    #[inline]
    fn add(self, (dr, dc): (i32, i32)) -> Position {
        Position::new(self.row + dr, self.col + dc)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// True iff both coordinates are within `[0, size)`
#[inline]
pub fn is_in_bounds(pos: Position, size: i32) -> bool {
    pos.row >= 0 && pos.row < size && pos.col >= 0 && pos.col < size
}

#[inline]
pub fn is_same_square(a: Position, b: Position) -> bool {
    a == b
}
