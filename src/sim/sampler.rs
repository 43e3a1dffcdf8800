//! Random safe-position sampling
//!
//! Hazards and food are placed on uniformly random cells that keep clear of
//! the creature (by a Chebyshev padding), of each other, and of a clearance
//! ring around deadly blocks. Random draws are bounded; after that the grid is
//! scanned so a free cell is always found when one exists.
//!
//! A clearance of 0 only keeps placements off the block footprints, which is
//! what food falls back to on a crowded board.

use glam::IVec2;
use rand::Rng;

use super::grid::{Grid, Position};
use super::state::{Blaster, Creature, DeadlyBlock, Flame, footprint_cells};
use crate::chebyshev;
use crate::consts::MAX_SAMPLE_ATTEMPTS;

/// Everything that blocks placement, borrowed from the game state
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub grid: Grid,
    pub creature: &'a Creature,
    pub food: Option<Position>,
    pub multiplier: Option<Position>,
    pub blasters: &'a [Blaster],
    pub flames: &'a [Flame],
    pub deadly_blocks: &'a [DeadlyBlock],
    /// Chebyshev distance kept from every deadly block cell
    pub deadly_clearance: i32,
}

impl Occupancy<'_> {
    /// Whether a single cell is placeable with the given creature padding
    pub fn is_free(&self, cell: Position, padding: i32) -> bool {
        self.grid.contains(cell)
            && self.creature.iter().all(|s| chebyshev(s, cell) > padding)
            && self.food != Some(cell)
            && self.multiplier != Some(cell)
            && !self.flames.iter().any(|f| f.pos == cell)
            && !self.blasters.iter().any(|b| b.pos == cell)
            && !self
                .deadly_blocks
                .iter()
                .any(|d| d.cells().any(|c| chebyshev(c, cell) <= self.deadly_clearance))
    }

    /// Whether every cell of a `footprint × footprint` square anchored at
    /// `anchor` is placeable
    pub fn fits(&self, anchor: Position, padding: i32, footprint: i32) -> bool {
        footprint_cells(anchor, footprint.max(1)).all(|c| self.is_free(c, padding))
    }

    /// Pick a free anchor cell, or `None` when the board has no room.
    ///
    /// Anchors are drawn from a range shrunk by `footprint - 1` at the far
    /// edges so the whole footprint lands on the grid.
    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        padding: i32,
        footprint: i32,
    ) -> Option<Position> {
        let footprint = footprint.max(1);
        let max_x = self.grid.cols - (footprint - 1);
        let max_y = self.grid.rows - (footprint - 1);
        if max_x <= 0 || max_y <= 0 {
            return None;
        }

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = IVec2::new(rng.random_range(0..max_x), rng.random_range(0..max_y));
            if self.fits(candidate, padding, footprint) {
                return Some(candidate);
            }
        }

        // Crowded board: fall back to a deterministic scan
        let found = (0..max_y)
            .flat_map(|y| (0..max_x).map(move |x| IVec2::new(x, y)))
            .find(|&c| self.fits(c, padding, footprint));
        if found.is_none() {
            log::debug!(
                "No free cell for footprint {} with padding {}",
                footprint,
                padding
            );
        }
        found
    }
}
