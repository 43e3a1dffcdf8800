//! Board configuration
//!
//! The browser build sizes the grid from the window: a square canvas of 75% of
//! the shorter edge, split into 20-unit cells.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_FRACTION, CELL_SIZE};
use crate::sim::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    /// RNG seed for the session
    #[serde(default)]
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: 30,
            rows: 30,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Grid for a square canvas `canvas_size` units wide
    pub fn from_canvas(canvas_size: u32, seed: u64) -> Self {
        let cells = (canvas_size / CELL_SIZE).max(1) as i32;
        Self {
            cols: cells,
            rows: cells,
            seed,
        }
    }

    /// Grid for a window of the given inner size
    pub fn from_window(width: f64, height: f64, seed: u64) -> Self {
        Self::from_canvas(canvas_size_for_window(width, height), seed)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.cols, self.rows)
    }

    /// Canvas extent in units for this grid
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.cols.max(1) as u32 * CELL_SIZE,
            self.rows.max(1) as u32 * CELL_SIZE,
        )
    }
}

/// Square canvas edge for a window: 75% of the shorter edge, floored
pub fn canvas_size_for_window(width: f64, height: f64) -> u32 {
    (width.min(height).max(0.0) * CANVAS_FRACTION).floor() as u32
}
