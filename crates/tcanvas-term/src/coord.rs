// SPDX-License-Identifier: MIT
//
// Screen coordinates and compass directions.
//
// Coordinates are 1-indexed (row 1, column 1 is the top-left cell) because
// that is what the terminal's CUP sequence speaks. Anything with a row or
// column below 1 is off-screen; `Coord::INVALID` is the canonical off-screen
// value and doubles as "not assigned yet" for figure vertices.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// ─── Coord ───────────────────────────────────────────────────────────────────

/// A (row, column) cell position, 1-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Off-screen sentinel, also used for "not yet assigned".
    pub const INVALID: Self = Self { row: -1, col: -1 };

    /// The top-left cell.
    pub const HOME: Self = Self { row: 1, col: 1 };

    /// Zero offset. Not a valid position, only useful as a delta.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this names an on-screen cell (both axes ≥ 1).
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.row > 0 && self.col > 0
    }

    /// Replace each unassigned axis (`-1`) with the matching axis of `fallback`.
    #[inline]
    #[must_use]
    pub const fn or(self, fallback: Self) -> Self {
        Self {
            row: if self.row == -1 { fallback.row } else { self.row },
            col: if self.col == -1 { fallback.col } else { self.col },
        }
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

/// Scalar offset applied to both axes.
impl Add<i32> for Coord {
    type Output = Self;

    #[inline]
    fn add(self, offset: i32) -> Self {
        Self::new(self.row + offset, self.col + offset)
    }
}

impl Sub for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Neg for Coord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.row, -self.col)
    }
}

impl AddAssign for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.row += rhs.row;
        self.col += rhs.col;
    }
}

impl AddAssign<i32> for Coord {
    #[inline]
    fn add_assign(&mut self, offset: i32) {
        self.row += offset;
        self.col += offset;
    }
}

impl SubAssign for Coord {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.row -= rhs.row;
        self.col -= rhs.col;
    }
}

impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.row, self.col)
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Compass directions as a bitfield.
    ///
    /// Diagonals are the OR of two orthogonal directions, and collision
    /// queries report every side that was hit in one value:
    ///
    /// ```
    /// use tcanvas_term::coord::Direction;
    ///
    /// let diagonal = Direction::RIGHT | Direction::UP;
    /// assert!(diagonal.contains(Direction::UP));
    /// assert!(!diagonal.contains(Direction::DOWN));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Direction: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const RIGHT = 1 << 2;
        const LEFT  = 1 << 3;
    }
}

impl Direction {
    /// Unit step for this direction, composing diagonals.
    #[must_use]
    pub fn step(self) -> Coord {
        let mut delta = Coord::ZERO;
        if self.contains(Self::UP) {
            delta.row -= 1;
        }
        if self.contains(Self::DOWN) {
            delta.row += 1;
        }
        if self.contains(Self::RIGHT) {
            delta.col += 1;
        }
        if self.contains(Self::LEFT) {
            delta.col -= 1;
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Coord ───────────────────────────────────────────────────────────

    #[test]
    fn invalid_is_not_valid() {
        assert!(!Coord::INVALID.is_valid());
        assert!(Coord::HOME.is_valid());
        assert!(!Coord::new(0, 5).is_valid());
        assert!(!Coord::new(5, 0).is_valid());
    }

    #[test]
    fn add_and_sub() {
        let a = Coord::new(3, 4);
        let b = Coord::new(1, -2);
        assert_eq!(a + b, Coord::new(4, 2));
        assert_eq!(a - b, Coord::new(2, 6));
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn scalar_offset_hits_both_axes() {
        assert_eq!(Coord::new(3, 4) + 2, Coord::new(5, 6));
        let mut c = Coord::new(1, 1);
        c += -1;
        assert_eq!(c, Coord::ZERO);
    }

    #[test]
    fn assign_ops() {
        let mut c = Coord::new(10, 10);
        c += Coord::new(1, 2);
        assert_eq!(c, Coord::new(11, 12));
        c -= Coord::new(1, 2);
        assert_eq!(c, Coord::new(10, 10));
    }

    #[test]
    fn neg_round_trip() {
        let d = Coord::new(2, -7);
        assert_eq!(-(-d), d);
        assert_eq!(d + -d, Coord::ZERO);
    }

    #[test]
    fn or_fills_unassigned_axes() {
        let cursor = Coord::new(7, 9);
        assert_eq!(Coord::INVALID.or(cursor), cursor);
        assert_eq!(Coord::new(3, -1).or(cursor), Coord::new(3, 9));
        assert_eq!(Coord::new(3, 4).or(cursor), Coord::new(3, 4));
    }

    #[test]
    fn display_matches_cup_parameters() {
        assert_eq!(Coord::new(12, 40).to_string(), "12;40");
    }

    // ── Direction ───────────────────────────────────────────────────────

    #[test]
    fn step_orthogonal() {
        assert_eq!(Direction::UP.step(), Coord::new(-1, 0));
        assert_eq!(Direction::DOWN.step(), Coord::new(1, 0));
        assert_eq!(Direction::RIGHT.step(), Coord::new(0, 1));
        assert_eq!(Direction::LEFT.step(), Coord::new(0, -1));
    }

    #[test]
    fn step_diagonal_composes() {
        assert_eq!((Direction::RIGHT | Direction::DOWN).step(), Coord::new(1, 1));
        assert_eq!((Direction::LEFT | Direction::UP).step(), Coord::new(-1, -1));
    }

    #[test]
    fn empty_direction_does_not_move() {
        assert_eq!(Direction::empty().step(), Coord::ZERO);
    }
}
