//! Discrete grid geometry: bounds and headings

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid cell coordinate, bounded to `[0, cols) × [0, rows)`
pub type Position = IVec2;

/// Fixed-size playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cols && pos.y < self.rows
    }

    /// Clamp a position onto the grid
    pub fn clamp(&self, pos: Position) -> Position {
        pos.clamp(IVec2::ZERO, IVec2::new(self.cols - 1, self.rows - 1))
    }
}

/// Creature heading
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

    /// Unit step in grid coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
