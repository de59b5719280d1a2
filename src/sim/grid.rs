//! Grid coordinates and headings
//!
//! Screen convention: x grows right, y grows down.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A board cell
pub type Cell = IVec2;

/// One of the four unit headings
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

    /// Unit vector for this heading
    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Heading for an on-screen control button name
    pub fn from_control(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// True iff the cell lies on a `grid_size` x `grid_size` board
#[inline]
pub fn in_bounds(cell: Cell, grid_size: i32) -> bool {
    (0..grid_size).contains(&cell.x) && (0..grid_size).contains(&cell.y)
}

#[inline]
pub fn cells_equal(a: Cell, b: Cell) -> bool {
    a == b
}

/// Center cell of the board (rounded toward the origin)
#[inline]
pub fn center(grid_size: i32) -> Cell {
    IVec2::splat(grid_size / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(IVec2::new(0, 0), 24));
        assert!(in_bounds(IVec2::new(23, 23), 24));
        assert!(!in_bounds(IVec2::new(-1, 5), 24));
        assert!(!in_bounds(IVec2::new(24, 5), 24));
        assert!(!in_bounds(IVec2::new(5, -1), 24));
        assert!(!in_bounds(IVec2::new(5, 24), 24));
    }

    #[test]
    fn test_opposites_cancel() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_from_control() {
        assert_eq!(Direction::from_control("up"), Some(Direction::Up));
        assert_eq!(Direction::from_control("Right"), Some(Direction::Right));
        assert_eq!(Direction::from_control("jump"), None);
    }

    #[test]
    fn test_center() {
        assert_eq!(center(24), IVec2::new(12, 12));
        assert!(cells_equal(center(5), IVec2::new(2, 2)));
    }
}
