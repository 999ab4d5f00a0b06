//! Grid coordinates and movement directions
//!
//! All coordinates are Cartesian with (0, 0) at the bottom left of the board
//! and (size - 1, size - 1) at the top right. Row-major storage lives in
//! [`Coord::to_index`] and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the board in (x, y) form
///
/// Signed so that a step off the edge is still representable and can be
/// rejected as out of bounds instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// The neighbouring cell in the given direction (may be off the board)
    pub fn step(self, direction: Direction) -> Coord {
        let (dx, dy) = direction.offset();
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Check if this coordinate lies on a square board of the given size
    pub fn in_bounds(self, size: usize) -> bool {
        let size = size as i32;
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }

    /// Row-major index into a square grid, top row first
    ///
    /// This is the single place where Cartesian coordinates are converted
    /// into storage order. Returns `None` for off-board coordinates.
    pub fn to_index(self, size: usize) -> Option<usize> {
        if !self.in_bounds(size) {
            return None;
        }
        let row = size - 1 - self.y as usize;
        Some(row * size + self.x as usize)
    }

    /// Inverse of [`Coord::to_index`]
    pub fn from_index(index: usize, size: usize) -> Coord {
        let row = index / size;
        let col = index % size;
        Coord::new(col as i32, (size - 1 - row) as i32)
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The cell itself plus its on-board 4-neighbourhood
    pub fn with_neighbours(self, size: usize) -> impl Iterator<Item = Coord> {
        std::iter::once(self)
            .chain(Direction::ALL.into_iter().map(move |d| self.step(d)))
            .filter(move |c| c.in_bounds(size))
    }

    /// Point reflection through the center of the board (180° rotation)
    pub fn mirrored(self, size: usize) -> Coord {
        let last = size as i32 - 1;
        Coord::new(last - self.x, last - self.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (dx, dy) with y growing upwards
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_corners() {
        let size = 4;
        // Bottom left is the first cell of the last row
        assert_eq!(Coord::new(0, 0).to_index(size), Some(12));
        // Top left is storage index 0
        assert_eq!(Coord::new(0, 3).to_index(size), Some(0));
        assert_eq!(Coord::new(3, 3).to_index(size), Some(3));
        assert_eq!(Coord::new(3, 0).to_index(size), Some(15));

        for index in 0..16 {
            let coord = Coord::from_index(index, size);
            assert_eq!(coord.to_index(size), Some(index));
        }
    }

    #[test]
    fn test_off_board_has_no_index() {
        assert_eq!(Coord::new(-1, 0).to_index(4), None);
        assert_eq!(Coord::new(0, 4).to_index(4), None);
        assert!(!Coord::new(4, 4).in_bounds(4));
    }

    #[test]
    fn test_step_and_opposite() {
        let origin = Coord::new(2, 2);
        for direction in Direction::ALL {
            assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }
        assert_eq!(origin.step(Direction::Up), Coord::new(2, 3));
        assert_eq!(origin.step(Direction::Left), Coord::new(1, 2));
    }

    #[test]
    fn test_neighbours_clipped_at_edges() {
        let corner: Vec<_> = Coord::new(0, 0).with_neighbours(4).collect();
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&Coord::new(0, 0)));
        assert!(corner.contains(&Coord::new(1, 0)));
        assert!(corner.contains(&Coord::new(0, 1)));

        let middle: Vec<_> = Coord::new(1, 1).with_neighbours(4).collect();
        assert_eq!(middle.len(), 5);
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Coord::new(0, 0).mirrored(20), Coord::new(19, 19));
        assert_eq!(Coord::new(8, 9).mirrored(20), Coord::new(11, 10));
        assert_eq!(Coord::new(3, 1).mirrored(20).mirrored(20), Coord::new(3, 1));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(3, 2)), 5);
        assert_eq!(Coord::new(3, 2).manhattan(Coord::new(0, 0)), 5);
    }
}
